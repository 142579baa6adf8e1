//! Google encoded polyline decoding.
//!
//! Each coordinate is the zig-zag encoded delta from the previous one, in units
//! of 1e-5 degrees, split into 5-bit chunks (least significant first). Every
//! chunk except the last carries the 0x20 continuation bit, and 63 is added to
//! make it printable.

use crate::constants::{
    POLYLINE_CHAR_OFFSET, POLYLINE_CHUNK_MASK, POLYLINE_CONTINUATION_BIT, POLYLINE_PRECISION,
};
use crate::models::Coordinates;

/// Decodes an encoded polyline into coordinates.
///
/// Empty input gives an empty list. Malformed or truncated input stops
/// decoding; the points decoded up to that position are returned.
pub fn decode_polyline(encoded: &str) -> Vec<Coordinates> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let Some(delta_lat) = next_value(bytes, &mut index) else {
            warn_malformed(encoded, index, points.len());
            break;
        };
        let Some(delta_lng) = next_value(bytes, &mut index) else {
            warn_malformed(encoded, index, points.len());
            break;
        };

        lat += delta_lat;
        lng += delta_lng;

        match Coordinates::new(
            lat as f64 / POLYLINE_PRECISION,
            lng as f64 / POLYLINE_PRECISION,
        ) {
            Ok(point) => points.push(point),
            Err(e) => {
                tracing::warn!(error = %e, decoded = points.len(), "Polyline decoded out-of-range coordinate, stopping");
                break;
            }
        }
    }

    points
}

/// Reads one zig-zag encoded value starting at `index`.
fn next_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index)?;
        *index += 1;

        if byte < POLYLINE_CHAR_OFFSET || shift > 60 {
            return None;
        }
        let chunk = (byte - POLYLINE_CHAR_OFFSET) as i64;
        result |= (chunk & POLYLINE_CHUNK_MASK) << shift;
        shift += 5;

        if chunk < POLYLINE_CONTINUATION_BIT {
            break;
        }
    }

    Some(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn warn_malformed(encoded: &str, index: usize, decoded: usize) {
    tracing::warn!(
        length = encoded.len(),
        position = index,
        decoded,
        "Malformed encoded polyline, keeping {} decoded points",
        decoded
    );
}
