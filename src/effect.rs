#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    PlayAttackSound,
    PlayHitSound,
}
