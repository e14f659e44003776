/// Unread badge backed by a single counter.
///
/// The count is authoritative only from the server; the client overwrites
/// it wholesale and never decrements on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadBadge {
    count: u32,
    display_cap: u32,
}

impl UnreadBadge {
    pub fn new(display_cap: u32) -> Self {
        Self {
            count: 0,
            display_cap,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn set(&mut self, count: u32) {
        self.count = count;
    }

    /// The badge is hidden entirely at zero rather than showing "0".
    pub fn is_visible(&self) -> bool {
        self.count > 0
    }

    /// Numeric label, capped for display (e.g. "99+"). `None` when hidden.
    pub fn display_label(&self) -> Option<String> {
        if self.count == 0 {
            return None;
        }

        if self.display_cap > 0 && self.count > self.display_cap {
            Some(format!("{}+", self.display_cap))
        } else {
            Some(self.count.to_string())
        }
    }
}
