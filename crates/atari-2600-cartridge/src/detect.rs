//! Scheme detection from image size and code signatures.
//!
//! Sizes pick the family. Within a family the image is searched for
//! instruction sequences that only make sense for one scheme, such as a
//! store to a hotspot that would be harmless on a plain cartridge.

use crate::error::CartridgeError;
use crate::scheme::Scheme;

/// Whether `signature` occurs at least `min_hits` times in `image`.
#[must_use]
pub fn find_signature(image: &[u8], signature: &[u8], min_hits: usize) -> bool {
    if signature.is_empty() || image.len() <= signature.len() {
        return false;
    }
    image
        .windows(signature.len())
        .filter(|window| *window == signature)
        .take(min_hits)
        .count()
        >= min_hits
}

fn any_signature(image: &[u8], signatures: &[&[u8]], min_hits: usize) -> bool {
    signatures
        .iter()
        .any(|signature| find_signature(image, signature, min_hits))
}

/// Pick a scheme for `image`.
pub fn detect_scheme(image: &[u8]) -> Result<Scheme, CartridgeError> {
    let size = image.len();
    let scheme = match size {
        0 => return Err(CartridgeError::Empty),
        1..=2048 => {
            if size == 2048 && is_probably_cv(image) {
                Scheme::Cv
            } else {
                Scheme::TwoK
            }
        }
        4096 => Scheme::FourK,
        8192 => {
            if is_probably_sc(image) {
                Scheme::F8Sc
            } else if is_probably_e0(image) {
                Scheme::E0
            } else if is_probably_3f(image) {
                Scheme::ThreeF
            } else if is_probably_ua(image) {
                Scheme::Ua
            } else if is_probably_0840(image) {
                Scheme::Ox0840
            } else {
                Scheme::F8
            }
        }
        12288 => Scheme::Fa,
        16384 => {
            if is_probably_sc(image) {
                Scheme::F6Sc
            } else if is_probably_e7(image) {
                Scheme::E7
            } else if is_probably_3f(image) {
                Scheme::ThreeF
            } else {
                Scheme::F6
            }
        }
        32768 => {
            if is_probably_sc(image) {
                Scheme::F4Sc
            } else if is_probably_3f(image) {
                Scheme::ThreeF
            } else {
                Scheme::F4
            }
        }
        _ if Scheme::ThreeF.fits(size) && is_probably_3f(image) => Scheme::ThreeF,
        _ => return Err(CartridgeError::Undetected { size }),
    };
    Ok(scheme)
}

/// Superchip images repeat their first 128 bytes in the next 128 of every
/// 4K bank, since that area is the RAM write port and never read as ROM.
fn is_probably_sc(image: &[u8]) -> bool {
    image
        .chunks_exact(4096)
        .all(|bank| bank[..128] == bank[128..256])
}

/// STA $F3FF,X or STA $F400,Y into the RAM write port.
fn is_probably_cv(image: &[u8]) -> bool {
    any_signature(image, &[&[0x9D, 0xFF, 0xF3], &[0x99, 0x00, 0xF4]], 1)
}

/// Accesses to the segment hotspots at $1FE0-$1FF7 and their mirrors.
fn is_probably_e0(image: &[u8]) -> bool {
    any_signature(
        image,
        &[
            &[0x8D, 0xE0, 0x1F],
            &[0x8D, 0xE0, 0x5F],
            &[0x8D, 0xE9, 0xFF],
            &[0x0C, 0xE0, 0x1F],
            &[0xAD, 0xE0, 0x1F],
            &[0xAD, 0xE9, 0xFF],
            &[0xAD, 0xED, 0xFF],
            &[0xAD, 0xF3, 0xBF],
        ],
        1,
    )
}

/// Slice and RAM bank hotspots at $1FE0-$1FEB.
fn is_probably_e7(image: &[u8]) -> bool {
    any_signature(
        image,
        &[
            &[0xAD, 0xE2, 0xFF],
            &[0xAD, 0xE5, 0xFF],
            &[0xAD, 0xE5, 0x1F],
            &[0xAD, 0xE7, 0x1F],
            &[0x0C, 0xE7, 0x1F],
            &[0x8D, 0xE7, 0xFF],
            &[0x8D, 0xE7, 0x1F],
        ],
        1,
    )
}

/// STA $3F at least twice.
fn is_probably_3f(image: &[u8]) -> bool {
    find_signature(image, &[0x85, 0x3F], 2)
}

/// Accesses to $0220/$0240 and their mirrors.
fn is_probably_ua(image: &[u8]) -> bool {
    any_signature(
        image,
        &[
            &[0x8D, 0x40, 0x02],
            &[0xAD, 0x40, 0x02],
            &[0xBD, 0x1F, 0x02],
            &[0x2C, 0xC0, 0x02],
            &[0x8D, 0xC0, 0x02],
        ],
        1,
    )
}

fn is_probably_0840(image: &[u8]) -> bool {
    any_signature(
        image,
        &[&[0xAD, 0x00, 0x08], &[0xAD, 0x40, 0x08], &[0x2C, 0x00, 0x08]],
        2,
    ) || any_signature(
        image,
        &[&[0x0C, 0x00, 0x08, 0x4C], &[0x0C, 0xFF, 0x0F, 0x4C]],
        2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An 8K image whose two RAM areas differ, so it is not taken for SC.
    fn plain_8k() -> Vec<u8> {
        let mut image = vec![0xEA; 8192];
        image[0] = 0x00;
        image[4096] = 0x00;
        image
    }

    fn with_code(mut image: Vec<u8>, at: usize, code: &[u8]) -> Vec<u8> {
        image[at..at + code.len()].copy_from_slice(code);
        image
    }

    #[test]
    fn empty_image_is_rejected() {
        assert_eq!(detect_scheme(&[]), Err(CartridgeError::Empty));
    }

    #[test]
    fn odd_sizes_are_undetected() {
        assert_eq!(
            detect_scheme(&vec![0; 3000]),
            Err(CartridgeError::Undetected { size: 3000 })
        );
        // A 6K image without 3F stores
        assert_eq!(
            detect_scheme(&vec![0xEA; 6144]),
            Err(CartridgeError::Undetected { size: 6144 })
        );
    }

    #[test]
    fn small_images() {
        assert_eq!(detect_scheme(&[0xEA; 512]), Ok(Scheme::TwoK));
        assert_eq!(detect_scheme(&[0xEA; 2048]), Ok(Scheme::TwoK));
        let cv = with_code(vec![0xEA; 2048], 100, &[0x9D, 0xFF, 0xF3]);
        assert_eq!(detect_scheme(&cv), Ok(Scheme::Cv));
        assert_eq!(detect_scheme(&[0xEA; 4096]), Ok(Scheme::FourK));
    }

    #[test]
    fn eight_k_family() {
        assert_eq!(detect_scheme(&plain_8k()), Ok(Scheme::F8));
        assert_eq!(detect_scheme(&vec![0xFF; 8192]), Ok(Scheme::F8Sc));

        let e0 = with_code(plain_8k(), 300, &[0x8D, 0xE0, 0x1F]);
        assert_eq!(detect_scheme(&e0), Ok(Scheme::E0));

        let three_f = with_code(plain_8k(), 300, &[0x85, 0x3F, 0xEA, 0x85, 0x3F]);
        assert_eq!(detect_scheme(&three_f), Ok(Scheme::ThreeF));

        let ua = with_code(plain_8k(), 300, &[0x8D, 0x40, 0x02]);
        assert_eq!(detect_scheme(&ua), Ok(Scheme::Ua));

        let once = with_code(plain_8k(), 300, &[0xAD, 0x00, 0x08]);
        assert_eq!(detect_scheme(&once), Ok(Scheme::F8));
        let twice = with_code(once, 600, &[0xAD, 0x00, 0x08]);
        assert_eq!(detect_scheme(&twice), Ok(Scheme::Ox0840));
    }

    #[test]
    fn larger_images() {
        assert_eq!(detect_scheme(&vec![0xEA; 12288]), Ok(Scheme::Fa));

        let mut f6 = vec![0xEA; 16384];
        f6[0] = 0;
        assert_eq!(detect_scheme(&f6), Ok(Scheme::F6));
        let e7 = with_code(f6, 500, &[0x8D, 0xE7, 0xFF]);
        assert_eq!(detect_scheme(&e7), Ok(Scheme::E7));

        let mut f4 = vec![0xEA; 32768];
        f4[0] = 0;
        assert_eq!(detect_scheme(&f4), Ok(Scheme::F4));
        assert_eq!(detect_scheme(&vec![0; 32768]), Ok(Scheme::F4Sc));
    }

    #[test]
    fn signature_hits_are_counted() {
        let image = [1, 2, 1, 2, 1, 2, 0];
        assert!(find_signature(&image, &[1, 2], 3));
        assert!(!find_signature(&image, &[1, 2], 4));
        assert!(!find_signature(&image, &[], 1));
    }
}
