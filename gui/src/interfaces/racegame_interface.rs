use anyhow::Context;
use flume::{Receiver, Sender};
use racegame::core::car::EffectEvent;
use racegame::interfaces::gui_interface::RaceState;
use racegame::interfaces::input::GuiCommand;

#[derive(Debug)]
pub struct RacegameInterface {
    pub rx: Receiver<RaceState>,
    pub tx: Sender<GuiCommand>,
    pub race_state: RaceState,
}

impl RacegameInterface {
    pub fn new(rx: Receiver<RaceState>, tx: Sender<GuiCommand>) -> RacegameInterface {
        RacegameInterface {
            rx,
            tx,
            race_state: Default::default(),
        }
    }

    /// The method obtains all race states in the channel and keeps the latest one. The effect
    /// events of all received states are returned, events from before a reset are dropped.
    pub fn update(&mut self) -> Vec<EffectEvent> {
        let mut effects = vec![];

        while let Ok(mut race_state) = self.rx.try_recv() {
            if race_state.reset_count != self.race_state.reset_count {
                effects.clear();
            }
            effects.append(&mut race_state.effects);
            self.race_state = race_state;
        }

        effects
    }

    pub fn send(&self, command: GuiCommand) -> anyhow::Result<()> {
        self.tx
            .send(command)
            .context("Failed to send command to the race simulation!")
    }
}
