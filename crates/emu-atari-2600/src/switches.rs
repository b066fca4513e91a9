//! Front panel switches, read through SWCHB.

/// Difficulty switch position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// Beginner.
    #[default]
    B,
    /// Expert.
    A,
}

/// Console switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSwitches {
    /// Game Reset held down.
    pub reset: bool,
    /// Game Select held down.
    pub select: bool,
    /// Colour (true) or black and white.
    pub colour: bool,
    /// Left and right difficulty.
    pub difficulty: [Difficulty; 2],
}

impl Default for ConsoleSwitches {
    fn default() -> Self {
        Self {
            reset: false,
            select: false,
            colour: true,
            difficulty: [Difficulty::B; 2],
        }
    }
}

impl ConsoleSwitches {
    /// Pin levels on port B. Pressed buttons read low; D2, D4 and D5 are
    /// not connected and read high.
    #[must_use]
    pub fn swchb(self) -> u8 {
        let mut value = 0x34;
        if !self.reset {
            value |= 0x01;
        }
        if !self.select {
            value |= 0x02;
        }
        if self.colour {
            value |= 0x08;
        }
        if self.difficulty[0] == Difficulty::A {
            value |= 0x40;
        }
        if self.difficulty[1] == Difficulty::A {
            value |= 0x80;
        }
        value
    }

    /// Switches that would produce `value` on port B.
    #[must_use]
    pub fn from_swchb(value: u8) -> Self {
        let difficulty = |bit: u8| {
            if value & bit != 0 {
                Difficulty::A
            } else {
                Difficulty::B
            }
        };
        Self {
            reset: value & 0x01 == 0,
            select: value & 0x02 == 0,
            colour: value & 0x08 != 0,
            difficulty: [difficulty(0x40), difficulty(0x80)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_console_reads_colour_and_nothing_pressed() {
        assert_eq!(ConsoleSwitches::default().swchb(), 0x3F);
    }

    #[test]
    fn bits_follow_the_switches() {
        let switches = ConsoleSwitches {
            reset: true,
            select: false,
            colour: false,
            difficulty: [Difficulty::A, Difficulty::B],
        };
        assert_eq!(switches.swchb(), 0x76);
        assert_eq!(ConsoleSwitches::from_swchb(0x76), switches);
    }
}
