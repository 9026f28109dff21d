mod natural;

pub use self::natural::{natural_cmp, natural_cmp_ignore_case};
