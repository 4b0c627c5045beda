use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value passed by the host alongside a callback.
///
/// The host only deals in cells, floats and strings; booleans arrive as
/// cells but scenario files may spell them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventArg {
    Flag(bool),
    Int(i32),
    Float(f32),
    Text(String),
}

impl fmt::Display for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArg::Flag(b) => write!(f, "{}", b),
            EventArg::Int(i) => write!(f, "{}", i),
            EventArg::Float(v) => write!(f, "{}", v),
            EventArg::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for EventArg {
    fn from(value: bool) -> Self {
        EventArg::Flag(value)
    }
}

impl From<i32> for EventArg {
    fn from(value: i32) -> Self {
        EventArg::Int(value)
    }
}

impl From<f32> for EventArg {
    fn from(value: f32) -> Self {
        EventArg::Float(value)
    }
}

impl From<&str> for EventArg {
    fn from(value: &str) -> Self {
        EventArg::Text(value.to_string())
    }
}

impl From<String> for EventArg {
    fn from(value: String) -> Self {
        EventArg::Text(value)
    }
}

/// Positional arguments of one host callback invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventArgs(Vec<EventArg>);

impl EventArgs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, arg: impl Into<EventArg>) {
        self.0.push(arg.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EventArg> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventArg> {
        self.0.iter()
    }

    /// Integer cell at `index`. Flags read as 0/1.
    pub fn int(&self, index: usize) -> Option<i32> {
        match self.0.get(index)? {
            EventArg::Int(i) => Some(*i),
            EventArg::Flag(b) => Some(i32::from(*b)),
            _ => None,
        }
    }

    /// Float at `index`. Integer cells are widened.
    pub fn float(&self, index: usize) -> Option<f32> {
        match self.0.get(index)? {
            EventArg::Float(v) => Some(*v),
            EventArg::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.0.get(index)? {
            EventArg::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean at `index`; any non-zero cell counts as true.
    pub fn flag(&self, index: usize) -> Option<bool> {
        match self.0.get(index)? {
            EventArg::Flag(b) => Some(*b),
            EventArg::Int(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl From<Vec<EventArg>> for EventArgs {
    fn from(args: Vec<EventArg>) -> Self {
        Self(args)
    }
}

impl FromIterator<EventArg> for EventArgs {
    fn from_iter<T: IntoIterator<Item = EventArg>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// Build [`EventArgs`] from a list of values convertible into [`EventArg`]
///
/// # Example
/// ```
/// use sampkit_events::event_args;
///
/// let args = event_args![0, "/help"];
/// assert_eq!(args.int(0), Some(0));
/// assert_eq!(args.text(1), Some("/help"));
/// ```
#[macro_export]
macro_rules! event_args {
    () => {
        $crate::EventArgs::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::EventArgs::from(vec![$($crate::EventArg::from($arg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        let args = event_args![3, 1.5f32, "hello", true];
        assert_eq!(args.len(), 4);
        assert_eq!(args.int(0), Some(3));
        assert_eq!(args.float(1), Some(1.5));
        assert_eq!(args.text(2), Some("hello"));
        assert_eq!(args.flag(3), Some(true));
    }

    #[test]
    fn test_accessors_coerce_cells() {
        let args = event_args![0, 7];
        assert_eq!(args.flag(0), Some(false));
        assert_eq!(args.flag(1), Some(true));
        assert_eq!(args.float(1), Some(7.0));
        assert_eq!(args.text(0), None);
        assert_eq!(args.int(5), None);
    }

    #[test]
    fn test_display_lists_args() {
        let args = event_args![12, "ok"];
        assert_eq!(args.to_string(), "(12, \"ok\")");
        assert_eq!(EventArgs::new().to_string(), "()");
    }
}
