use crate::particle::Particle;

/// Schema Component: Model Group (spec §3.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelGroup {
    pub compositor: Compositor,
    pub particles: Vec<Particle>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compositor {
    Sequence,
    Choice,
    All,
    Interleave,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelGroupDefinition {
    pub name: xb_xstypes::QName,
    pub model_group: ModelGroup,
}
