/// Per-channel lower bound deciding which pixels belong to the key region.
///
/// A pixel is "key" when R, G and B all strictly exceed the bound. The default
/// of 150 keys out near-white regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct KeyThreshold(pub u8);

impl Default for KeyThreshold {
    fn default() -> Self {
        Self(150)
    }
}

/// Classify one pixel. Pure, per-pixel, strict `>` on every channel.
#[inline]
pub fn is_key(r: u8, g: u8, b: u8, threshold: KeyThreshold) -> bool {
    let t = threshold.0;
    r > t && g > t && b > t
}
