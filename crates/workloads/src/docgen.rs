// Rust guideline compliant 2026-03-04

//! Synthetic document generation.
//!
//! Field names count in base 26 (`a`..`z`, then two letters); field values
//! are uniform in `0..documents` so every key lookup has a plausible hit;
//! padding is a configurable slab whose leading fraction is zeroes
//! (the "compressibility" knob) and whose tail is random bytes.

use std::collections::BTreeMap;

use domain::Document;
use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use uuid::Uuid;

use crate::profile::StoreProfile;

/// Name of the `i`th document field: `a`..`z`, then `ba`, `bb`, ...
/// (digits recurse most-significant first, so index 26 is `ba`; the
/// leading digit of a two-letter name never reads as zero).
#[must_use]
pub fn field_name(i: usize) -> String {
    fn push_digits(i: usize, out: &mut String) {
        if i < 26 {
            out.push(char::from(b'a' + u8::try_from(i).unwrap_or(0)));
        } else {
            push_digits(i / 26, out);
            push_digits(i % 26, out);
        }
    }
    let mut name = String::new();
    push_digits(i, &mut name);
    name
}

/// A random UUID built from RNG bytes, so document ids follow the
/// generator's RNG rather than a separate entropy source.
pub fn random_id(rng: &mut StdRng) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// `profile.fields` named fields with uniform values in `0..documents`.
pub fn random_fields(rng: &mut StdRng, profile: &StoreProfile) -> BTreeMap<String, i64> {
    let bound = i64::try_from(profile.documents.max(1)).unwrap_or(i64::MAX);
    (0..profile.fields)
        .map(|i| (field_name(i), rng.random_range(0..bound)))
        .collect()
}

fn random_padding(rng: &mut StdRng, profile: &StoreProfile) -> Vec<u8> {
    let mut padding = vec![0_u8; profile.padding];
    let fraction = profile.compressibility.clamp(0.0, 1.0);
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "padding sizes are small and the product is clamped to the slab"
    )]
    let zero_bytes = ((profile.padding as f64) * fraction) as usize;
    let zero_bytes = zero_bytes.min(profile.padding);
    rng.fill_bytes(&mut padding[zero_bytes..]);
    padding
}

/// One complete random document: id, fields, padding.
pub fn random_document(rng: &mut StdRng, profile: &StoreProfile) -> Document {
    Document {
        id: random_id(rng),
        fields: random_fields(rng, profile),
        padding: random_padding(rng, profile),
    }
}
