/// A named portal. Entering one moves the traveller to the gate named by
/// `target`, wrapped in a fade.
#[derive(Debug, Clone, PartialEq)]
pub struct GateComponent {
    /// Name of the destination gate. `None` makes this an exit-only gate.
    pub target: Option<String>,
    /// Music started when a traveller arrives at this gate.
    pub music: Option<String>,
    /// Played when a traveller steps into this gate.
    pub enter_sound: Option<String>,
    /// Played when a traveller comes out of this gate.
    pub exit_sound: Option<String>,
    /// Duration of each half of the fade, in seconds.
    pub fade_duration: f32,
    /// Fires on contact instead of waiting for the interact button.
    pub automatic: bool,
    pub disabled: bool,
}

impl Default for GateComponent {
    fn default() -> Self {
        Self {
            target: None,
            music: None,
            enter_sound: None,
            exit_sound: None,
            fade_duration: 0.4,
            automatic: false,
            disabled: false,
        }
    }
}

impl GateComponent {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_music(mut self, music: impl Into<String>) -> Self {
        self.music = Some(music.into());
        self
    }

    pub fn with_sounds(mut self, enter: Option<String>, exit: Option<String>) -> Self {
        self.enter_sound = enter;
        self.exit_sound = exit;
        self
    }

    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = seconds.max(0.0);
        self
    }

    pub fn automatic(mut self) -> Self {
        self.automatic = true;
        self
    }

    /// Sound ids this gate references.
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        [&self.music, &self.enter_sound, &self.exit_sound]
            .into_iter()
            .filter_map(|s| s.as_deref())
    }
}
