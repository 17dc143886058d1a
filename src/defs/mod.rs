pub mod flags;

pub use self::flags::Buttons;

/// The three enemy variants. The set is closed; behaviour is picked by
/// [`crate::sim::Behavior::for_kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Slow melee seeker.
    Zombie,
    /// Fast melee seeker.
    Runner,
    /// Keeps its distance, strafes and shoots.
    Shooter,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Zombie, EnemyKind::Runner, EnemyKind::Shooter];

    /// Share of a level's enemy total given to this kind.
    pub fn share(self) -> f32 {
        match self {
            EnemyKind::Zombie => 0.60,
            EnemyKind::Runner => 0.25,
            EnemyKind::Shooter => 0.15,
        }
    }

    /// (body, head) colours, 0x00RRGGBB.
    pub fn colors(self) -> (u32, u32) {
        match self {
            EnemyKind::Zombie => (0x00_96_96_96, 0x00_D2_D2_D2),
            EnemyKind::Runner => (0x00_78_D2_E6, 0x00_DC_F0_FF),
            EnemyKind::Shooter => (0x00_D2_78_E6, 0x00_FA_D2_FF),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Medkit,
    Ammo,
}

impl PickupKind {
    pub fn color(self) -> u32 {
        match self {
            PickupKind::Medkit => 0x00_6E_C8_78,
            PickupKind::Ammo => 0x00_F0_DC_78,
        }
    }
}
