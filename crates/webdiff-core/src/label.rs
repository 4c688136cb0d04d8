//! Scenario labels: bounded length, unique within a run.

/// Default maximum label length in characters.
pub const DEFAULT_LABEL_MAX_LEN: usize = 100;

/// Monotonic sequence used to make truncated labels unique.
///
/// One counter lives for the whole run; a fresh one starts over at zero.
#[derive(Debug, Default, Clone)]
pub struct LabelCounter {
    next: u64,
}

impl LabelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments, then returns the new value. The first call returns 1.
    pub fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

/// Returns `s` unchanged if it is at most `max_len` characters, otherwise a
/// string of exactly `max_len` characters made of a prefix, a `--N--` marker
/// carrying the next counter value, and a suffix of `s`.
///
/// The prefix gets the extra character when the remaining room is odd. If
/// `max_len` cannot even hold the marker, the marker alone is returned.
pub fn truncate_middle_unique(s: &str, max_len: usize, counter: &mut LabelCounter) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }

    let separator = format!("--{}--", counter.bump());
    splice(s, len, max_len, &separator)
}

/// Like [`truncate_middle_unique`], but always embeds a fresh marker, even in
/// short input. Used to re-label a value whose label was already issued.
///
/// Short input gets the marker appended when it fits; otherwise the marker
/// replaces the middle as in truncation.
pub fn relabel(s: &str, max_len: usize, counter: &mut LabelCounter) -> String {
    let len = s.chars().count();
    let separator = format!("--{}--", counter.bump());
    if len + separator.len() <= max_len {
        return format!("{s}{separator}");
    }
    splice(s, len, max_len, &separator)
}

fn splice(s: &str, len: usize, max_len: usize, separator: &str) -> String {
    let room = max_len.saturating_sub(separator.len()).min(len);
    let front = room.div_ceil(2);
    let back = room / 2;

    let mut out = String::with_capacity(max_len);
    out.extend(s.chars().take(front));
    out.push_str(separator);
    out.extend(s.chars().skip(len - back));
    out
}
