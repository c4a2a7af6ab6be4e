//! Fine-grained lockdown reasons and their label table.
//!
//! A reason names one sensitive capability a gated call site may ask about
//! ("raw MSR access", "use of kprobes", ...). Reasons form a strict total
//! order: every reason sits either in the integrity range (at or below
//! [`LockdownReason::IntegrityMax`]) or the confidentiality range (above it,
//! at or below [`LockdownReason::ConfidentialityMax`]). The two `*Max`
//! variants are milestone markers that bound those ranges; they double as the
//! targets an operator can select through the control surface.
//!
//! # Invariants
//!
//! - [INV-REASON-001] The ordering is fixed at definition time and never
//!   reordered; each reason has exactly one ordinal.
//! - [INV-REASON-002] The label mapping is exhaustive over the enum, so an
//!   unlabeled or out-of-range lookup cannot exist.
//! - [INV-REASON-003] `IntegrityMax` and `ConfidentialityMax` are valid,
//!   distinct members of the ordered set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One sensitive capability that a lockdown level may restrict.
///
/// Ordering: `None < ... < IntegrityMax < ... < ConfidentialityMax`. A
/// capability is restricted once the active level's ordinal reaches its
/// ordinal, so everything at or below `IntegrityMax` is denied under
/// integrity lockdown and the full set is denied under confidentiality
/// lockdown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(u8)]
pub enum LockdownReason {
    /// No restriction; the floor of the order.
    #[default]
    None             = 0,
    /// Loading of unsigned kernel-style modules.
    ModuleSignature  = 1,
    /// Direct access to physical memory device nodes.
    DevMem           = 2,
    /// Firmware test interface access.
    EfiTest          = 3,
    /// Handing execution to an unsigned replacement image.
    Kexec            = 4,
    /// Suspend-to-disk of the running image.
    Hibernation      = 5,
    /// Direct PCI configuration access.
    PciAccess        = 6,
    /// Raw I/O port access.
    Ioport           = 7,
    /// Raw model-specific register access.
    Msr              = 8,
    /// Runtime modification of ACPI tables.
    AcpiTables       = 9,
    /// Direct PCMCIA CIS storage writes.
    PcmciaCis        = 10,
    /// Reconfiguration of serial port I/O.
    Tiocsserial      = 11,
    /// Module parameters that take arbitrary addresses.
    ModuleParameters = 12,
    /// Unsafe MMIO tracing.
    Mmiotrace        = 13,
    /// Debug filesystem access.
    Debugfs          = 14,
    /// Milestone marker bounding the integrity range.
    IntegrityMax     = 15,
    /// Reading the kernel core image.
    Kcore            = 16,
    /// Use of kprobes.
    Kprobes          = 17,
    /// BPF reads of kernel memory.
    BpfRead          = 18,
    /// Unsafe use of performance monitoring.
    Perf             = 19,
    /// Trace filesystem access.
    Tracefs          = 20,
    /// Milestone marker bounding the confidentiality range; the topmost
    /// sentinel. Not a valid input to the authorization check.
    ConfidentialityMax = 21,
}

impl LockdownReason {
    /// Human-readable label, used by audit notices and the control surface.
    ///
    /// The match is exhaustive: every reason has a non-empty label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ModuleSignature => "unsigned module loading",
            Self::DevMem => "/dev/mem,kmem,port",
            Self::EfiTest => "/dev/efi_test access",
            Self::Kexec => "kexec of unsigned images",
            Self::Hibernation => "hibernation",
            Self::PciAccess => "direct PCI access",
            Self::Ioport => "raw io port access",
            Self::Msr => "raw MSR access",
            Self::AcpiTables => "modifying ACPI tables",
            Self::PcmciaCis => "direct PCMCIA CIS storage",
            Self::Tiocsserial => "reconfiguration of serial port IO",
            Self::ModuleParameters => "unsafe module parameters",
            Self::Mmiotrace => "unsafe mmio",
            Self::Debugfs => "debugfs access",
            Self::IntegrityMax => "integrity",
            Self::Kcore => "/proc/kcore access",
            Self::Kprobes => "use of kprobes",
            Self::BpfRead => "use of bpf to read kernel RAM",
            Self::Perf => "unsafe use of perf",
            Self::Tracefs => "use of tracefs",
            Self::ConfidentialityMax => "confidentiality",
        }
    }

    /// Returns the numeric ordinal within the fixed order.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Construct from ordinal, returning `None` for out-of-range values.
    #[must_use]
    pub const fn from_ordinal(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::ModuleSignature),
            2 => Some(Self::DevMem),
            3 => Some(Self::EfiTest),
            4 => Some(Self::Kexec),
            5 => Some(Self::Hibernation),
            6 => Some(Self::PciAccess),
            7 => Some(Self::Ioport),
            8 => Some(Self::Msr),
            9 => Some(Self::AcpiTables),
            10 => Some(Self::PcmciaCis),
            11 => Some(Self::Tiocsserial),
            12 => Some(Self::ModuleParameters),
            13 => Some(Self::Mmiotrace),
            14 => Some(Self::Debugfs),
            15 => Some(Self::IntegrityMax),
            16 => Some(Self::Kcore),
            17 => Some(Self::Kprobes),
            18 => Some(Self::BpfRead),
            19 => Some(Self::Perf),
            20 => Some(Self::Tracefs),
            21 => Some(Self::ConfidentialityMax),
            _ => None,
        }
    }

    /// Returns `true` for the two milestone markers.
    #[must_use]
    pub const fn is_milestone(self) -> bool {
        matches!(self, Self::IntegrityMax | Self::ConfidentialityMax)
    }
}

impl fmt::Display for LockdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Tests
// =============================================================================
