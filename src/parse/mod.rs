pub mod command_parser;
pub mod task_parser;
pub mod task_serializer;
pub mod timestamp;

pub use command_parser::{Command, ParseError, parse};
pub use task_parser::{DroppedLine, FormatError, decode_all, decode_line};
pub use task_serializer::{encode_all, encode_line};
pub use timestamp::{format_display, format_timestamp, parse_timestamp};
