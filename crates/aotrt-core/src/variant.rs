//! Registry of runtime variants.
//!
//! The compiler picks one variant crate per target; generated code can ask
//! which one it was linked against through `aotrt_variant()`, and what it can
//! do right now through `aotrt_variant_caps()`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Variant {
    #[default]
    Hosted = 1,
    Embedded = 2,
    Sandboxed = 3,
}

/// What a variant can do. Crosses the ABI as a bit set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VariantCaps {
    pub can_write: bool,
    pub can_read: bool,
    pub has_clock: bool,
    /// Each thread sees its own error frames.
    pub thread_local_errors: bool,
    pub unwind_personality: bool,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Hosted, Variant::Embedded, Variant::Sandboxed];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Hosted => "hosted",
            Variant::Embedded => "embedded",
            Variant::Sandboxed => "sandboxed",
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(Variant::Hosted),
            2 => Some(Variant::Embedded),
            3 => Some(Variant::Sandboxed),
            _ => None,
        }
    }

    /// Baseline before build features and integrator wiring; the variant
    /// crates refine it in `Runtime::caps`. Embedded I/O exists only once
    /// hooks are installed, so its baseline reports none.
    pub fn caps(self) -> VariantCaps {
        match self {
            Variant::Hosted => VariantCaps {
                can_write: true,
                can_read: true,
                has_clock: true,
                thread_local_errors: true,
                unwind_personality: true,
            },
            Variant::Embedded => VariantCaps {
                can_write: false,
                can_read: false,
                has_clock: false,
                thread_local_errors: false,
                unwind_personality: false,
            },
            Variant::Sandboxed => VariantCaps {
                can_write: true,
                can_read: true,
                has_clock: true,
                thread_local_errors: true,
                unwind_personality: false,
            },
        }
    }
}

impl VariantCaps {
    pub const CAN_WRITE: u32 = 1 << 0;
    pub const CAN_READ: u32 = 1 << 1;
    pub const HAS_CLOCK: u32 = 1 << 2;
    pub const THREAD_LOCAL_ERRORS: u32 = 1 << 3;
    pub const UNWIND_PERSONALITY: u32 = 1 << 4;

    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        for (set, bit) in [
            (self.can_write, Self::CAN_WRITE),
            (self.can_read, Self::CAN_READ),
            (self.has_clock, Self::HAS_CLOCK),
            (self.thread_local_errors, Self::THREAD_LOCAL_ERRORS),
            (self.unwind_personality, Self::UNWIND_PERSONALITY),
        ] {
            if set {
                bits |= bit;
            }
        }
        bits
    }

    /// Unknown bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        VariantCaps {
            can_write: bits & Self::CAN_WRITE != 0,
            can_read: bits & Self::CAN_READ != 0,
            has_clock: bits & Self::HAS_CLOCK != 0,
            thread_local_errors: bits & Self::THREAD_LOCAL_ERRORS != 0,
            unwind_personality: bits & Self::UNWIND_PERSONALITY != 0,
        }
    }
}

impl core::fmt::Display for Variant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
