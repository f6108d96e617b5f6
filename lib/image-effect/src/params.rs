use strum::{Display, EnumIter, EnumString};

/// The filters the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    #[default]
    SepiaTone,
    UnsharpMask,
    Vignette,
}

impl FilterKind {
    /// Human readable name shown in the filter chooser.
    pub fn title(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }
}

/// Semantic role of an adjustable filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ParamRole {
    Intensity,
    Radius,
    Scale,
}

impl ParamRole {
    fn bit(self) -> u8 {
        match self {
            ParamRole::Intensity => 0b001,
            ParamRole::Radius => 0b010,
            ParamRole::Scale => 0b100,
        }
    }
}

/// Set of roles a filter exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParamRoles(u8);

impl ParamRoles {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, role: ParamRole) -> Self {
        self.insert(role);
        self
    }

    pub fn insert(&mut self, role: ParamRole) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: ParamRole) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Roles in declaration order: intensity, radius, scale.
    pub fn iter(self) -> impl Iterator<Item = ParamRole> {
        [ParamRole::Intensity, ParamRole::Radius, ParamRole::Scale]
            .into_iter()
            .filter(move |role| self.contains(*role))
    }
}

impl FromIterator<ParamRole> for ParamRoles {
    fn from_iter<I: IntoIterator<Item = ParamRole>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), ParamRoles::with)
    }
}

/// Concrete parameter values handed to the engine for a single render.
///
/// A role left unset falls back to the filter's own default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterParams {
    pub intensity: Option<f32>,
    pub radius: Option<f32>,
    pub scale: Option<f32>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, role: ParamRole, value: f32) {
        match role {
            ParamRole::Intensity => self.intensity = Some(value),
            ParamRole::Radius => self.radius = Some(value),
            ParamRole::Scale => self.scale = Some(value),
        }
    }

    pub fn get(&self, role: ParamRole) -> Option<f32> {
        match role {
            ParamRole::Intensity => self.intensity,
            ParamRole::Radius => self.radius,
            ParamRole::Scale => self.scale,
        }
    }

    /// Roles that carry a value.
    pub fn roles(&self) -> ParamRoles {
        [ParamRole::Intensity, ParamRole::Radius, ParamRole::Scale]
            .into_iter()
            .filter(|role| self.get(*role).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roles().is_empty()
    }
}
