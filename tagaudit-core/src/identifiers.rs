//! Collection identifiers to audit.
//!
//! The embedded list is the set of factory/collection names configured in
//! `reco_flags.py`. It is plain data: the audit takes the list as an argument
//! and never reads it from a global.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Collection names declared in the default reconstruction flags table.
pub const DEFAULT_IDENTIFIERS: &[&str] = &[
    "B0ECalClusters",
    "B0ECalIslandProtoClusters",
    "B0ECalRawHits",
    "B0ECalRecHits",
    "BarrelTrackerHit",
    "BarrelTrackerRawHit",
    "BarrelVertexHit",
    "BarrelVertexRawHit",
    "CentralCKFTrajectories",
    "DRICHAerogelTracks",
    "DRICHGasTracks",
    "DRICHRawHits",
    "EcalBarrelImagingClusters",
    "EcalBarrelImagingMergedClusters",
    "EcalBarrelImagingProtoClusters",
    "EcalBarrelImagingRawHits",
    "EcalBarrelImagingRecHits",
    "EcalBarrelScFiClusters",
    "EcalBarrelScFiProtoClusters",
    "EcalBarrelScFiRawHits",
    "EcalBarrelScFiRecHits",
    "EcalBarrelSciGlassClusters",
    "EcalBarrelSciGlassProtoClusters",
    "EcalBarrelSciGlassRawHits",
    "EcalBarrelSciGlassRecHits",
    "EcalBarrelSciGlassTruthClusters",
    "EcalBarrelscFiMergedHits",
    "EcalEndcapNClusters",
    "EcalEndcapNIslandProtoClusters",
    "EcalEndcapNRawHits",
    "EcalEndcapNRecHits",
    "EcalEndcapNTruthClusters",
    "EcalEndcapPClusters",
    "EcalEndcapPInsertClusters",
    "EcalEndcapPInsertIslandProtoClusters",
    "EcalEndcapPInsertRawHits",
    "EcalEndcapPInsertRecHits",
    "EcalEndcapPInsertTruthClusters",
    "EcalEndcapPIslandProtoClusters",
    "EcalEndcapPRawHits",
    "EcalEndcapPRecHits",
    "EcalEndcapPTruthClusters",
    "EndcapTrackerHit",
    "EndcapTrackerRawHit",
    "ForwardRomanPotParticles",
    "ForwardRomanPotRawHits",
    "ForwardRomanPotRecHits",
    "GeneratedParticles",
    "HcalBarrelClusters",
    "HcalBarrelIslandProtoClusters",
    "HcalBarrelMergedHits",
    "HcalBarrelRawHits",
    "HcalBarrelRecHits",
    "HcalBarrelTruthClusters",
    "HcalEndcapNClusters",
    "HcalEndcapNIslandProtoClusters",
    "HcalEndcapNMergedHits",
    "HcalEndcapNRawHits",
    "HcalEndcapNRecHits",
    "HcalEndcapNTruthClusters",
    "HcalEndcapPClusters",
    "HcalEndcapPInsertClusters",
    "HcalEndcapPInsertIslandProtoClusters",
    "HcalEndcapPInsertRawHits",
    "HcalEndcapPInsertRecHits",
    "HcalEndcapPInsertTruthClusters",
    "HcalEndcapPIslandProtoClusters",
    "HcalEndcapPMergedHits",
    "HcalEndcapPRawHits",
    "HcalEndcapPRecHits",
    "HcalEndcapPTruthClusters",
    "MPGDTrackerHit",
    "MPGDTrackerRawHit",
    "TOFBarrelRawHit",
    "TOFBarrelTrackerHit",
    "TOFEndcapRawHit",
    "TOFEndcapTrackerHit",
    "ZDCEcalClusters",
    "ZDCEcalIslandProtoClusters",
    "ZDCEcalRawHits",
    "ZDCEcalRecHits",
    "ZDCEcalTruthClusters",
];

/// Returns the identifiers in lexicographic (byte) order.
///
/// Duplicates are kept; each occurrence is audited on its own.
pub fn load_identifiers<S: AsRef<str>>(list: &[S]) -> Vec<String> {
    let mut ids: Vec<String> = list.iter().map(|s| s.as_ref().to_string()).collect();
    ids.sort();
    ids
}

/// The embedded list, sorted.
pub fn default_identifiers() -> Vec<String> {
    load_identifiers(DEFAULT_IDENTIFIERS)
}

/// Matches a table entry such as `('BEMC:EcalBarrelRawHits:capacityADC', ...`.
fn table_entry_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: hardcoded pattern.
    REGEX.get_or_init(|| {
        Regex::new(r"^\(\s*'[^':]+:([^':]+):[^']*'").expect("Hardcoded regex pattern is valid")
    })
}

/// Extracts the collection names declared in a flags table.
///
/// Each flag is named `DETECTOR:Collection:parameter`; the middle segment is
/// the identifier. Commented-out entries are skipped. The result is distinct
/// and sorted.
pub fn identifiers_from_table(text: &str) -> Vec<String> {
    let re = table_entry_regex();
    let found: BTreeSet<String> = text
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| re.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    found.into_iter().collect()
}
