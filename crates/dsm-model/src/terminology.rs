//! Display metadata for the code systems the editor offers.
//!
//! Terminology lookup (resolving individual codes) is out of scope; only the
//! system URLs and their human-readable names live here.

/// A supported clinical code system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSystem {
    pub name: &'static str,
    pub system: &'static str,
}

pub const SUPPORTED_CODE_SYSTEMS: [CodeSystem; 3] = [
    CodeSystem {
        name: "SNOMED CT",
        system: "http://snomed.info/sct",
    },
    CodeSystem {
        name: "LOINC",
        system: "http://loinc.org",
    },
    CodeSystem {
        name: "RxNorm",
        system: "http://www.nlm.nih.gov/research/umls/rxnorm",
    },
];

/// Display name for a code system URL, if it is one we know.
pub fn code_system_name(system: &str) -> Option<&'static str> {
    SUPPORTED_CODE_SYSTEMS
        .iter()
        .find(|cs| cs.system == system)
        .map(|cs| cs.name)
}
