use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::system::snapshot::ChartSnapshot;
use crate::ui::theme::Theme;

pub struct App {
    pub running: bool,
    pub snapshot: Arc<ChartSnapshot>,
    pub show_legend: bool,
    pub worker_stopped: bool,
    pub theme: Theme,
}

impl App {
    pub fn new(snapshot: Arc<ChartSnapshot>, show_legend: bool) -> Self {
        App {
            running: true,
            snapshot,
            show_legend,
            worker_stopped: false,
            theme: Theme::default(),
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('l') => Action::ToggleLegend,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleLegend => self.show_legend = !self.show_legend,
            Action::None => {}
        }
    }

    pub fn on_snapshot(&mut self, snapshot: Arc<ChartSnapshot>) {
        self.snapshot = snapshot;
    }

    pub fn on_worker_stopped(&mut self) {
        self.worker_stopped = true;
        self.running = false;
    }
}
