//! Terminal deck state and input handling

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::card::{self, card_rect, cell_to_px};
use super::event::{Event, EventHandler};
use super::ui::Terminal;
use crate::domain::{
    Decision, DecisionHandler, DeckEvent, Direction, InputSource, ItemId, SwipeDeck, Verdict,
};

type Deck<V> = SwipeDeck<V, Box<dyn DecisionHandler>>;

pub struct DeckApp<V: Verdict> {
    deck: Deck<V>,
    title: String,

    /// Region the cards were last drawn into
    deck_area: Rect,

    /// Latest status line (decisions, failures)
    status_message: Option<String>,
    failure_count: usize,

    should_quit: bool,
}

impl<V: Verdict> DeckApp<V> {
    pub fn new(deck: Deck<V>, title: &str) -> Self {
        Self {
            deck,
            title: title.to_string(),
            deck_area: Rect::default(),
            status_message: None,
            failure_count: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            self.deck.tick(Instant::now());
            self.absorb_events();

            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::FocusLost => self.abandon_drag(),
                Event::Resize | Event::Tick => {}
            }
        }
        Ok(())
    }

    /// Tears the deck down and hands back its decisions
    pub fn finish(self) -> Vec<Decision<V>> {
        self.deck.teardown()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.deck.swipe(Direction::Left, now);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.deck.swipe(Direction::Right, now);
            }
            KeyCode::Char('r') => self.deck.reset(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = cell_to_px(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A press while still dragging means the last release was lost
                self.abandon_drag();
                if let Some(target) = self.hit_test(mouse.column, mouse.row) {
                    self.deck.pointer_down(InputSource::Pointer, x, y, Some(&target));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.deck.pointer_move(InputSource::Pointer, x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.deck.pointer_up(InputSource::Pointer, Instant::now());
            }
            _ => {}
        }
    }

    /// Springs back a drag whose release will not arrive
    fn abandon_drag(&mut self) {
        if self.deck.pointer_cancel(InputSource::Pointer) {
            tracing::debug!("Abandoned drag without release");
        }
    }

    /// Item under a terminal cell, topmost card first
    fn hit_test(&self, column: u16, row: u16) -> Option<ItemId> {
        let position = Position::new(column, row);
        self.deck
            .layers()
            .iter()
            .find(|layer| {
                card_rect(self.deck_area, layer.depth, layer.scale, layer.feedback.offset.x)
                    .contains(position)
            })
            .map(|layer| layer.item.id.clone())
    }

    fn absorb_events(&mut self) {
        for event in self.deck.drain_events() {
            match event {
                DeckEvent::Committed(decision) => {
                    self.status_message = Some(format!(
                        "{} {}",
                        capitalize(decision.verdict.label()),
                        decision.item_id
                    ));
                }
                DeckEvent::Exhausted => {
                    self.status_message = Some("All done".to_string());
                }
                DeckEvent::Reset => {
                    self.status_message = Some("Deck reset".to_string());
                    self.failure_count = 0;
                }
                DeckEvent::Duplicate(_) | DeckEvent::DragCancelled(_) | DeckEvent::Advanced { .. } => {}
            }
        }

        for failure in self.deck.drain_failures() {
            self.failure_count += 1;
            self.status_message = Some(format!(
                "Could not {} {}: {}",
                failure.verdict, failure.item_id, failure.message
            ));
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.deck_area = chunks[1];
        self.draw_deck(frame, chunks[1]);
        self.draw_status_bar(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let queue = self.deck.queue();
        let text = format!(
            "{}  {}/{} decided",
            self.title,
            queue.processed_count(),
            queue.len()
        );
        let header = Paragraph::new(text)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_deck(&self, frame: &mut Frame, area: Rect) {
        let layers = self.deck.layers();
        if layers.is_empty() {
            let message = if self.deck.is_settling() {
                ""
            } else {
                "All done. Press r to start over or q to quit."
            };
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Green));
            frame.render_widget(empty, Rect { y: area.y + area.height / 2, height: 1, ..area });
            return;
        }

        let labels = V::KIND.verdict_labels();
        for layer in layers.iter().rev() {
            card::draw(frame, area, layer, labels);
        }
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
        let (negative, affirmative) = V::KIND.verdict_labels();
        let keys = format!(
            "←/h {}  →/l {}  drag card  r reset  q quit",
            negative, affirmative
        );

        let status = match &self.status_message {
            Some(message) if self.failure_count > 0 => Line::from(vec![
                Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(keys, Style::default().fg(Color::DarkGray)),
            ]),
            Some(message) => Line::from(vec![
                Span::raw(message.clone()),
                Span::raw("  "),
                Span::styled(keys, Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray))),
        };

        let bar = Paragraph::new(status).block(Block::default().borders(Borders::TOP));
        frame.render_widget(bar, area);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
