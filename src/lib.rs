pub mod behavior;
pub mod clock;
pub mod codec;
pub mod config;
pub mod drive;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod select;
pub mod seq;
pub mod session;
pub mod sink;
pub mod transport;

pub use behavior::{Robot, TargetSource};
pub use clock::{Clock, SystemClock};
pub use drive::Drivetrain;
pub use error::WireError;
pub use frame::FrameBuffer;
pub use protocol::report::{Report, Target};
pub use protocol::{BaudRate, Command};
pub use session::{RadarSession, SessionError};
pub use sink::LogSink;
pub use transport::Transport;
