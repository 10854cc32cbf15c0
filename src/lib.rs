pub mod masked;
pub mod validators;

pub use masked::date_util;
pub use masked::text_edit;
pub use masked::{
    DatePart, DatePartKind, DateTimeMaskParser, MaskOptions, MaskParser, Replaced,
};
