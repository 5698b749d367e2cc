//! The memory engine: H0, lane initialization, segment filling, reference
//! addressing, and finalization.
//!
//! Covers all three variants and both wire versions. `W`, the reference
//! area size, is computed with a saturating subtraction so it never
//! underflows at a segment's first position (see DESIGN.md).

use crate::block::{Block, Matrix};
use crate::blake2b::{h, h_prime};
use crate::mixing::{compress, compress_twice};
use crate::params::{Params, Variant, Version};
use crate::workers::Workers;

const SYNC_POINTS: u32 = 4;
/// Number of `(J1, J2)` pairs one 1024-byte address block yields.
const ADDRESSES_PER_BLOCK: usize = 128;

/// Computes H0, the 64-byte pre-hashing digest.
pub fn initial_hash(params: &Params, password: &[u8], out_len: usize) -> [u8; 64] {
    let len32 = |n: usize| (n as u32).to_le_bytes();
    h(&[
        &params.lanes().to_le_bytes(),
        &(out_len as u32).to_le_bytes(),
        &params.m_kb().to_le_bytes(),
        &params.t_cost().to_le_bytes(),
        &params.version().as_u32().to_le_bytes(),
        &params.variant().as_u32().to_le_bytes(),
        &len32(password.len()),
        password,
        &len32(params.salt().len()),
        params.salt(),
        &len32(params.secret().len()),
        params.secret(),
        &len32(params.ad().len()),
        params.ad(),
    ])
}

/// Seeds the first two blocks of every lane from H0, then fills
/// the remainder of the matrix over `params.t_cost()` passes,
/// returning the final tag.
pub fn hash_into(params: &Params, password: &[u8], out: &mut [u8]) {
    let mut matrix = Matrix::new(params.lanes(), params.lane_len());
    let mut h0 = initial_hash(params, password, out.len());

    let mut workers = Workers::new(params.lanes());

    for lane in 0..params.lanes() {
        seed_lane(&mut matrix, &h0, lane);
    }

    for pass in 0..params.t_cost() {
        for slice in 0..SYNC_POINTS {
            workers.map(&mut matrix, &move |m: &mut Matrix, lane: u32| {
                fill_segment(m, params, pass, slice, lane);
            });
        }
    }

    use zeroize::Zeroize;
    h0.zeroize();

    let mut last = matrix.xor_last_blocks();
    h_prime(out, &[last.as_bytes()]);
    last.zeroize();
}

fn seed_lane(matrix: &mut Matrix, h0: &[u8; 64], lane: u32) {
    for i in 0..2u32 {
        let block = matrix.block_mut(lane, i);
        h_prime(
            block.as_bytes_mut(),
            &[h0, &i.to_le_bytes(), &lane.to_le_bytes()],
        );
    }
}

/// Generates the data-independent `(J1, J2)` address stream for one
/// segment (RFC 9106 §3.3.1), regenerating its 1024-byte address block
/// every 128 addresses.
struct AddressGen {
    input: Block,
    addresses: Block,
    next: usize,
}

impl AddressGen {
    /// `first_b` is the segment index the caller's fill loop starts at
    /// (2 for pass 0 / slice 0, 0 otherwise). The address stream is
    /// indexed by segment position, not by calls made, so a generator
    /// built for a loop that starts mid-block must seed its read
    /// position from `first_b` rather than 0.
    fn new(
        pass: u32,
        lane: u32,
        slice: u32,
        block_count: u32,
        passes: u32,
        variant: Variant,
        first_b: u32,
    ) -> Self {
        let mut input = Block::zero();
        input.words_mut()[0] = pass as u64;
        input.words_mut()[1] = lane as u64;
        input.words_mut()[2] = slice as u64;
        input.words_mut()[3] = block_count as u64;
        input.words_mut()[4] = passes as u64;
        input.words_mut()[5] = variant.as_u32() as u64;

        let mut gen = AddressGen { input, addresses: Block::zero(), next: first_b as usize };
        gen.advance();
        gen
    }

    fn advance(&mut self) {
        self.input.words_mut()[6] += 1;
        compress_twice(&mut self.addresses, &self.input);
    }

    fn next_pair(&mut self) -> (u32, u32) {
        let word = self.addresses.words()[self.next];
        self.next = (self.next + 1) % ADDRESSES_PER_BLOCK;
        if self.next == 0 {
            self.advance();
        }
        ((word & 0xffff_ffff) as u32, (word >> 32) as u32)
    }
}

/// Fills one `(pass, slice, lane)` segment in place.
fn fill_segment(matrix: &mut Matrix, params: &Params, pass: u32, slice: u32, lane: u32) {
    let lane_len = params.lane_len();
    let segment_len = params.segment_len();
    let lanes = params.lanes();
    let data_independent = params.variant().data_independent(pass, slice);
    let first_b = if pass == 0 && slice == 0 { 2 } else { 0 };

    let mut addr_gen = data_independent.then(|| {
        AddressGen::new(
            pass,
            lane,
            slice,
            params.block_count(),
            params.t_cost(),
            params.variant(),
            first_b,
        )
    });

    let mut cur_index = lane * lane_len + slice * segment_len + first_b;
    let mut prev_index = if slice == 0 && first_b == 0 {
        lane * lane_len + lane_len - 1
    } else {
        cur_index - 1
    };

    for b in first_b..segment_len {
        let (j1, j2) = if let Some(gen) = addr_gen.as_mut() {
            gen.next_pair()
        } else {
            let prev = matrix.block(lane, prev_index - lane * lane_len);
            ((prev.words()[0] & 0xffff_ffff) as u32, (prev.words()[0] >> 32) as u32)
        };

        let ref_lane = if pass == 0 && slice == 0 { lane } else { j2 % lanes };

        let w = reference_area_size(pass, slice, b, ref_lane == lane, segment_len, lane_len);
        let x = ((j1 as u64) * (j1 as u64)) >> 32;
        let y = (w as u64 * x) >> 32;
        let relative = w - 1 - y as u32;

        let start = if pass != 0 && slice != SYNC_POINTS - 1 {
            (slice + 1) * segment_len
        } else {
            0
        };
        let ref_idx = (start + relative) % lane_len;

        let cur = (lane, cur_index - lane * lane_len);
        let prev = (lane, prev_index - lane * lane_len);
        let rf = (ref_lane, ref_idx);

        let (wr, rd_prev, rd_ref) = matrix.get3(cur, prev, rf);
        let mut computed = Block::zero();
        compress(&mut computed, rd_prev, rd_ref);

        if params.version() == Version::V0x10 || pass == 0 {
            *wr = computed;
        } else {
            *wr ^= &computed;
        }

        prev_index = cur_index;
        cur_index += 1;
    }
}

/// The reference area size `W`, following RFC 9106 §3.4.1.1's
/// non-underflowing definition (see DESIGN.md).
fn reference_area_size(
    pass: u32,
    slice: u32,
    b: u32,
    same_lane: bool,
    segment_len: u32,
    lane_len: u32,
) -> u32 {
    let w = if pass == 0 {
        if slice == 0 {
            b.saturating_sub(1)
        } else if same_lane {
            slice * segment_len + b - 1
        } else {
            (slice * segment_len).saturating_sub(if b == 0 { 1 } else { 0 })
        }
    } else if same_lane {
        lane_len - segment_len + b - 1
    } else {
        (lane_len - segment_len).saturating_sub(if b == 0 { 1 } else { 0 })
    };
    w.max(1)
}
