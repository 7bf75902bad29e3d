//! Art style selection - fixed suffix applied to the generation prompt

use clap::ValueEnum;

/// Art styles offered by the UI. `None` leaves the prompt untouched;
/// every other choice appends `", in {style} style"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ArtStyle {
    #[default]
    None,
    Anime,
    Cyberpunk,
    Realistic,
    OilPainting,
    Sketch,
    PixarStyle,
}

impl std::fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Anime => write!(f, "Anime"),
            Self::Cyberpunk => write!(f, "Cyberpunk"),
            Self::Realistic => write!(f, "Realistic"),
            Self::OilPainting => write!(f, "Oil Painting"),
            Self::Sketch => write!(f, "Sketch"),
            Self::PixarStyle => write!(f, "Pixar-style"),
        }
    }
}

impl ArtStyle {
    /// All selectable styles, in menu order.
    pub const ALL: [ArtStyle; 7] = [
        Self::None,
        Self::Anime,
        Self::Cyberpunk,
        Self::Realistic,
        Self::OilPainting,
        Self::Sketch,
        Self::PixarStyle,
    ];

    /// Parse a user-supplied style name. Unknown names fall back to `None`.
    pub fn from_name(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.to_string().eq_ignore_ascii_case(s))
            .unwrap_or(Self::None)
    }

    /// Apply the style suffix to a prompt.
    pub fn apply(&self, prompt: &str) -> String {
        match self {
            Self::None => prompt.to_string(),
            other => format!("{}, in {} style", prompt, other),
        }
    }
}
