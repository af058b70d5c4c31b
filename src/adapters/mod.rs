//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                 | Connects to            |
//! |------------|----------------------------|------------------------|
//! | `log_sink` | EventSink, `log::Log`      | Serial / stderr log    |
//! | `sim`      | AnalogInput                | Triangle-wave joystick |
//! |            | SetDutyCycle               | In-memory PWM channel  |
//! |            | DisplayOutput              | Debug log lines        |
//! |            | MatrixOutput               | In-memory pixel stream |

pub mod log_sink;
pub mod sim;
