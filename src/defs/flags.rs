use bitflags::bitflags;

bitflags! {
    /// Held buttons carried by every [`crate::sim::InputCmd`].
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u8 {
        // Fire the weapon while held (rate limited by the cooldown).
        const FIRE = 0x01;
        // Sprint multiplier on movement.
        const RUN  = 0x02;
    }
}
