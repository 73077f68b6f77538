//! Quadrature decoding for the rotary encoder.

/// Channel levels `(a << 1) | b` of a detented encoder at rest (both lines pulled up).
const REST_STATE: u8 = 0b11;

/// Quarter-step direction for one Gray-code transition; 0 for no change or an
/// invalid jump where both channels flipped at once.
fn transition(prev: u8, curr: u8) -> i8 {
    match (prev, curr) {
        (0b00, 0b01) | (0b01, 0b11) | (0b11, 0b10) | (0b10, 0b00) => 1,
        (0b00, 0b10) | (0b10, 0b11) | (0b11, 0b01) | (0b01, 0b00) => -1,
        _ => 0,
    }
}

/// Turns raw channel samples into whole detent steps.
///
/// A step is reported when the encoder returns to its rest state after at least
/// three net quarter-steps in one direction. Contact bounce that wanders back to
/// where it started nets out to zero.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    state: u8,
    quarter_steps: i8,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    pub fn new() -> Self {
        Self {
            state: REST_STATE,
            quarter_steps: 0,
        }
    }

    /// Feeds the current levels (`true` = high). Returns `+1`/`-1` when a detent completes.
    pub fn update(&mut self, a: bool, b: bool) -> i32 {
        let curr = ((a as u8) << 1) | b as u8;
        if curr == self.state {
            return 0;
        }
        self.quarter_steps = self
            .quarter_steps
            .saturating_add(transition(self.state, curr));
        self.state = curr;

        if curr != REST_STATE {
            return 0;
        }
        let step = if self.quarter_steps >= 3 {
            1
        } else if self.quarter_steps <= -3 {
            -1
        } else {
            0
        };
        self.quarter_steps = 0;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut QuadratureDecoder, states: &[u8]) -> Vec<i32> {
        states
            .iter()
            .map(|s| decoder.update(s & 0b10 != 0, s & 0b01 != 0))
            .filter(|step| *step != 0)
            .collect()
    }

    #[test]
    fn test_clockwise_detent() {
        let mut d = QuadratureDecoder::new();
        assert_eq!(feed(&mut d, &[0b10, 0b00, 0b01, 0b11]), vec![1]);
        assert_eq!(feed(&mut d, &[0b10, 0b00, 0b01, 0b11]), vec![1]);
    }

    #[test]
    fn test_counter_clockwise_detent() {
        let mut d = QuadratureDecoder::new();
        assert_eq!(feed(&mut d, &[0b01, 0b00, 0b10, 0b11]), vec![-1]);
    }

    #[test]
    fn test_bounce_back_to_rest_is_ignored() {
        let mut d = QuadratureDecoder::new();
        assert!(feed(&mut d, &[0b10, 0b11, 0b10, 0b11]).is_empty());
        assert!(feed(&mut d, &[0b10, 0b00, 0b10, 0b11]).is_empty());
    }

    #[test]
    fn test_invalid_jump_drops_detent() {
        let mut d = QuadratureDecoder::new();
        // 00 -> 11 flips both channels and contributes nothing
        assert_eq!(feed(&mut d, &[0b10, 0b00, 0b11]), Vec::<i32>::new());
        assert_eq!(feed(&mut d, &[0b10, 0b00, 0b01, 0b11]), vec![1]);
    }

    #[test]
    fn test_repeated_samples_do_nothing() {
        let mut d = QuadratureDecoder::new();
        assert!(feed(&mut d, &[0b11, 0b11, 0b11]).is_empty());
    }
}
