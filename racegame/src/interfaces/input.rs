// pointer offsets from the canvas center are amplified such that the full steering range is
// reached before the canvas edge
const POINTER_STEER_GAIN: f64 = 1.5;

/// ControlSignal is the abstracted steering intent consumed by the integrator. It does not know
/// whether it originates from keys, a touch screen or an autopilot.
///
/// * `left`, `right` - Discrete steering signals (each counts as -1 or +1)
/// * `analog_steer` - Continuous steering in [-1, 1] (negative = left)
/// * `throttle` - Gas pedal, only relevant if the car does not accelerate automatically
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlSignal {
    pub left: bool,
    pub right: bool,
    pub analog_steer: f64,
    pub throttle: bool,
}

impl ControlSignal {
    pub fn new(left: bool, right: bool, analog_steer: f64, throttle: bool) -> ControlSignal {
        ControlSignal {
            left,
            right,
            analog_steer: clamp_steer(analog_steer),
            throttle,
        }
    }

    /// from_analog creates a signal that only uses the continuous steering channel.
    pub fn from_analog(analog_steer: f64) -> ControlSignal {
        ControlSignal::new(false, false, analog_steer, false)
    }

    /// pointer_offset_to_steer converts a pointer or touch position x on a canvas of the given width
    /// into an analog steering value.
    pub fn pointer_offset_to_steer(x: f64, width: f64) -> f64 {
        if !(width > 0.0) {
            return 0.0;
        }
        let center = width / 2.0;
        clamp_steer((x - center) / center * POINTER_STEER_GAIN)
    }
}

fn clamp_steer(analog_steer: f64) -> f64 {
    if analog_steer.is_nan() {
        0.0
    } else {
        analog_steer.max(-1.0).min(1.0)
    }
}

/// GuiCommand contains the messages the input collaborator sends to the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuiCommand {
    Control(ControlSignal),
    Start,
    Reset,
}

/// InputSnapshot is the input consumed by exactly one simulation time step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub control: ControlSignal,
    pub start_requested: bool,
    pub reset_requested: bool,
}

impl InputSnapshot {
    pub fn new(control: ControlSignal) -> InputSnapshot {
        InputSnapshot {
            control,
            ..Default::default()
        }
    }

    /// from_commands folds all commands that arrived since the previous time step into a single
    /// snapshot. The latest control signal wins (control is kept if none arrived), start and
    /// reset requests latch.
    pub fn from_commands<I>(control: ControlSignal, commands: I) -> InputSnapshot
    where
        I: IntoIterator<Item = GuiCommand>,
    {
        let mut input = InputSnapshot::new(control);

        for command in commands {
            match command {
                GuiCommand::Control(control) => input.control = control,
                GuiCommand::Start => input.start_requested = true,
                GuiCommand::Reset => {
                    // a reset discards a start that was requested before it
                    input.reset_requested = true;
                    input.start_requested = false;
                }
            }
        }

        input
    }
}
