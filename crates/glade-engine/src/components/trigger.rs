/// Area that reports when the player walks into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerComponent {
    /// Fire only on the first entry.
    pub once: bool,
    fired: bool,
    inside: bool,
}

impl TriggerComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }

    /// Feed the current overlap state. Returns true on the tick the overlap
    /// begins, unless a one-shot trigger already fired.
    pub fn observe(&mut self, inside: bool) -> bool {
        let entered = inside && !self.inside;
        self.inside = inside;
        if !entered || (self.once && self.fired) {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
