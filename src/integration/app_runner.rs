use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::layout::Rect;
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::{
    core::{
        cmd_executor::CmdExecutor,
        message::{AppMsg, SystemMsg},
        state::AppState,
    },
    infrastructure::tui::{Event, TuiLike},
    presentation::components::Components,
};

const DEFAULT_NOTIFICATION_INTERVAL: Duration = Duration::from_secs(10);

enum Step {
    Event(Option<Event>),
    Msg(AppMsg),
}

/// Drives the application: terminal events, command results and the two intervals (feed sync
/// and notification polling) all feed `AppState::update`, whose commands go to the executor.
pub struct AppRunner<T: TuiLike> {
    state: AppState,
    executor: CmdExecutor,
    rx: mpsc::UnboundedReceiver<AppMsg>,
    tui: T,
    components: Components,
    sync_interval: Duration,
    notification_interval: Duration,
    dirty: bool,
}

impl<T: TuiLike> AppRunner<T> {
    pub fn new(
        state: AppState,
        executor: CmdExecutor,
        rx: mpsc::UnboundedReceiver<AppMsg>,
        tui: T,
        sync_interval: Duration,
    ) -> Self {
        Self {
            state,
            executor,
            rx,
            tui,
            components: Components::new(),
            sync_interval,
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL,
            dirty: true,
        }
    }

    pub fn with_notification_interval(mut self, interval: Duration) -> Self {
        self.notification_interval = interval;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tui(&self) -> &T {
        &self.tui
    }

    /// Run until the user quits or the terminal stops producing events
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        let commands = self.state.init();
        self.executor.execute_commands(commands);

        // `init` already asked for the first page
        let mut sync = time::interval_at(
            time::Instant::now() + self.sync_interval,
            self.sync_interval,
        );
        sync.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut poll = time::interval(self.notification_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let result = loop {
            let step = tokio::select! {
                event = self.tui.next() => Step::Event(event),
                Some(msg) = self.rx.recv() => Step::Msg(msg),
                _ = sync.tick() => Step::Msg(AppMsg::System(SystemMsg::Tick)),
                _ = poll.tick() => Step::Msg(AppMsg::System(SystemMsg::PollNotifications)),
            };

            let handled = match step {
                Step::Event(Some(event)) => self.handle_event(event),
                Step::Event(None) => break Ok(()),
                Step::Msg(msg) => {
                    self.dispatch(msg);
                    Ok(())
                }
            };
            if let Err(e) = handled {
                break Err(e);
            }

            if self.state.should_quit {
                break Ok(());
            }
        };

        self.tui.exit()?;
        result
    }

    fn dispatch(&mut self, msg: AppMsg) {
        let commands = self.state.update(msg);
        self.executor.execute_commands(commands);
        self.dirty = true;
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                let commands = self.state.handle_key(key, Instant::now());
                self.executor.execute_commands(commands);
                self.dirty = true;
            }
            Event::Paste(text) => self.dispatch(AppMsg::System(SystemMsg::Paste(text))),
            Event::Resize(width, height) => {
                self.tui.resize(Rect::new(0, 0, width, height))?;
                self.dispatch(AppMsg::System(SystemMsg::Resize(width, height)));
                self.render()?;
            }
            Event::Render => {
                if self.dirty {
                    self.render()?;
                }
            }
            Event::Quit | Event::Closed => self.dispatch(AppMsg::System(SystemMsg::Quit)),
            Event::Error => self.dispatch(AppMsg::System(SystemMsg::ShowError(String::from(
                "failed to read terminal input",
            )))),
            Event::Init
            | Event::Tick
            | Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_) => {}
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        let components = &self.components;
        self.tui.draw(&mut |frame| components.render(frame, state))?;
        self.dirty = false;
        Ok(())
    }
}
