// A quadratic probe sequence.
//
// Attempt `n` visits `(base + n^2) mod capacity`. Coverage of every slot is
// not guaranteed unless the capacity is prime (and even then only half the
// slots are reached), so the sequence is bounded by the capacity and running
// out of attempts is a normal outcome.
pub struct Probe {
    // The current index in the probe sequence.
    pub i: usize,
    // The number of steps taken so far.
    pub len: usize,
    // The length of the table.
    capacity: usize,
}

impl Probe {
    // Initialize the probe sequence, returning the maximum number of attempts.
    #[inline]
    pub fn start(base: usize, capacity: usize) -> (Probe, usize) {
        debug_assert!(base < capacity);

        let probe = Probe {
            i: base,
            len: 0,
            capacity,
        };

        (probe, capacity)
    }

    // Increment the probe sequence.
    #[inline]
    pub fn next(&mut self) {
        // (n + 1)^2 - n^2 = 2n + 1, which avoids squaring large attempt counts
        let step = (2 * (self.len % self.capacity) + 1) % self.capacity;
        self.len += 1;

        self.i += step;
        if self.i >= self.capacity {
            self.i -= self.capacity;
        }
    }
}
