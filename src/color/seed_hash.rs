//! 64-bit string hash used to derive stable series colors.
//!
//! This is the CityHash-family hash that common C++ standard libraries use
//! for `std::hash<std::string>` on 64-bit targets, so a label maps to the same
//! color across implementations.

const K0: u64 = 0xc3a5_c85c_97cb_3127;
const K1: u64 = 0xb492_b66f_be98_f273;
const K2: u64 = 0x9ae1_6a3b_2f90_404f;
const K3: u64 = 0xc949_d7c7_509e_6557;
const MUL: u64 = 0x9ddf_ea08_eb38_2d69;

/// Hash a byte string.
pub(crate) fn seed_hash(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    if len <= 16 {
        return hash_len_0_to_16(bytes);
    }
    if len <= 32 {
        return hash_len_17_to_32(bytes);
    }
    if len <= 64 {
        return hash_len_33_to_64(bytes);
    }

    // Hash the tail first, then walk 64-byte chunks keeping 56 bytes of state.
    let mut x = load64(bytes, len - 40);
    let mut y = load64(bytes, len - 16).wrapping_add(load64(bytes, len - 56));
    let mut z = hash_len_16(
        load64(bytes, len - 48).wrapping_add(len as u64),
        load64(bytes, len - 24),
    );
    let mut v = weak_hash_32(bytes, len - 64, len as u64, z);
    let mut w = weak_hash_32(bytes, len - 32, y.wrapping_add(K1), x);
    x = x.wrapping_mul(K1).wrapping_add(load64(bytes, 0));

    let mut remaining = (len - 1) & !63;
    let mut at = 0;
    loop {
        x = x
            .wrapping_add(y)
            .wrapping_add(v.0)
            .wrapping_add(load64(bytes, at + 8))
            .rotate_right(37)
            .wrapping_mul(K1);
        y = y
            .wrapping_add(v.1)
            .wrapping_add(load64(bytes, at + 48))
            .rotate_right(42)
            .wrapping_mul(K1);
        x ^= w.1;
        y = y.wrapping_add(v.0).wrapping_add(load64(bytes, at + 40));
        z = z.wrapping_add(w.0).rotate_right(33).wrapping_mul(K1);
        v = weak_hash_32(bytes, at, v.1.wrapping_mul(K1), x.wrapping_add(w.0));
        w = weak_hash_32(
            bytes,
            at + 32,
            z.wrapping_add(w.1),
            y.wrapping_add(load64(bytes, at + 16)),
        );
        std::mem::swap(&mut z, &mut x);
        at += 64;
        remaining -= 64;
        if remaining == 0 {
            break;
        }
    }

    hash_len_16(
        hash_len_16(v.0, w.0)
            .wrapping_add(shift_mix(y).wrapping_mul(K1))
            .wrapping_add(z),
        hash_len_16(v.1, w.1).wrapping_add(x),
    )
}

fn hash_len_0_to_16(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    if len > 8 {
        let a = load64(bytes, 0);
        let b = load64(bytes, len - 8);
        let rotated = b.wrapping_add(len as u64).rotate_right(len as u32);
        return hash_len_16(a, rotated) ^ b;
    }
    if len >= 4 {
        let a = load32(bytes, 0);
        let b = load32(bytes, len - 4);
        // The shift stays in 32 bits, matching the reference hash.
        return hash_len_16((len as u64).wrapping_add(u64::from(a << 3)), u64::from(b));
    }
    if len > 0 {
        let a = u32::from(bytes[0]);
        let b = u32::from(bytes[len >> 1]);
        let c = u32::from(bytes[len - 1]);
        let y = a.wrapping_add(b << 8);
        let z = (len as u32).wrapping_add(c << 2);
        let mixed = u64::from(y).wrapping_mul(K2) ^ u64::from(z).wrapping_mul(K3);
        return shift_mix(mixed).wrapping_mul(K2);
    }
    K2
}

fn hash_len_17_to_32(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    let a = load64(bytes, 0).wrapping_mul(K1);
    let b = load64(bytes, 8);
    let c = load64(bytes, len - 8).wrapping_mul(K2);
    let d = load64(bytes, len - 16).wrapping_mul(K0);
    hash_len_16(
        a.wrapping_sub(b)
            .rotate_right(43)
            .wrapping_add(c.rotate_right(30))
            .wrapping_add(d),
        a.wrapping_add((b ^ K3).rotate_right(20))
            .wrapping_sub(c)
            .wrapping_add(len as u64),
    )
}

fn hash_len_33_to_64(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    let mut z = load64(bytes, 24);
    let mut a = load64(bytes, 0).wrapping_add(
        (len as u64)
            .wrapping_add(load64(bytes, len - 16))
            .wrapping_mul(K0),
    );
    let mut b = a.wrapping_add(z).rotate_right(52);
    let mut c = a.rotate_right(37);
    a = a.wrapping_add(load64(bytes, 8));
    c = c.wrapping_add(a.rotate_right(7));
    a = a.wrapping_add(load64(bytes, 16));
    let vf = a.wrapping_add(z);
    let vs = b.wrapping_add(a.rotate_right(31)).wrapping_add(c);

    a = load64(bytes, 16).wrapping_add(load64(bytes, len - 32));
    z = z.wrapping_add(load64(bytes, len - 8));
    b = a.wrapping_add(z).rotate_right(52);
    c = a.rotate_right(37);
    a = a.wrapping_add(load64(bytes, len - 24));
    c = c.wrapping_add(a.rotate_right(7));
    a = a.wrapping_add(load64(bytes, len - 16));
    let wf = a.wrapping_add(z);
    let ws = b.wrapping_add(a.rotate_right(31)).wrapping_add(c);

    let r = shift_mix(
        vf.wrapping_add(ws)
            .wrapping_mul(K2)
            .wrapping_add(wf.wrapping_add(vs).wrapping_mul(K0)),
    );
    shift_mix(r.wrapping_mul(K0).wrapping_add(vs)).wrapping_mul(K2)
}

fn weak_hash_32(bytes: &[u8], at: usize, a: u64, b: u64) -> (u64, u64) {
    let w = load64(bytes, at);
    let x = load64(bytes, at + 8);
    let y = load64(bytes, at + 16);
    let z = load64(bytes, at + 24);

    let mut a = a.wrapping_add(w);
    let mut b = b.wrapping_add(a).wrapping_add(z).rotate_right(21);
    let c = a;
    a = a.wrapping_add(x).wrapping_add(y);
    b = b.wrapping_add(a.rotate_right(44));
    (a.wrapping_add(z), b.wrapping_add(c))
}

fn hash_len_16(u: u64, v: u64) -> u64 {
    let mut a = (u ^ v).wrapping_mul(MUL);
    a ^= a >> 47;
    let mut b = (v ^ a).wrapping_mul(MUL);
    b ^= b >> 47;
    b.wrapping_mul(MUL)
}

fn shift_mix(value: u64) -> u64 {
    value ^ (value >> 47)
}

fn load64(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0_u8; 8];
    word.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(word)
}

fn load32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0_u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_matches_reference() {
        assert_eq!(seed_hash(b"test") % 16, 7);
    }

    #[test]
    fn every_length_class_is_deterministic() {
        let text: Vec<u8> = (0..200_u8).collect();
        for len in [0, 1, 3, 4, 8, 9, 16, 17, 32, 33, 64, 65, 128, 129, 200] {
            let slice = &text[..len];
            assert_eq!(seed_hash(slice), seed_hash(slice), "len {len}");
        }
    }

    #[test]
    fn distinct_inputs_spread() {
        let a = seed_hash(b"series-a");
        let b = seed_hash(b"series-b");
        assert_ne!(a, b);
    }
}
