//! TIA audio: two channels built from a 5-bit frequency divider, a 4-bit
//! pulse counter and a 5-bit noise counter.
//!
//! Each channel is clocked in two phases per half scanline. Phase 0 updates
//! the divider and decides the feedback for the next shift. Phase 1 shifts
//! the counters and produces a sample, so the raw output rate is two
//! samples per line (about 31.4 kHz on NTSC). The raw stream is averaged
//! down to the configured output rate.

#![allow(clippy::cast_precision_loss)]

use emu_core::{Serializer, StateError};

/// Colour clocks per raw audio sample.
pub const CLOCKS_PER_SAMPLE: u32 = 114;

#[derive(Debug, Clone, Default)]
pub(crate) struct AudioChannel {
    /// AUDCx, D0-D3.
    pub audc: u8,
    /// AUDFx, D0-D4.
    pub audf: u8,
    /// AUDVx, D0-D3.
    pub audv: u8,

    clock_enable: bool,
    noise_feedback: bool,
    noise_counter_bit4: bool,
    pulse_counter_hold: bool,
    div_counter: u8,
    pulse_counter: u8,
    noise_counter: u8,
}

impl AudioChannel {
    pub fn phase0(&mut self) {
        if self.clock_enable {
            self.noise_counter_bit4 = self.noise_counter & 0x01 != 0;

            self.pulse_counter_hold = match self.audc & 0x03 {
                0x02 => self.noise_counter & 0x1E != 0x02,
                0x03 => !self.noise_counter_bit4,
                _ => false,
            };

            self.noise_feedback = if self.audc & 0x03 == 0 {
                (self.pulse_counter ^ self.noise_counter) & 0x01 != 0
                    || (self.noise_counter == 0 && self.pulse_counter == 0x0A)
                    || self.audc & 0x0C == 0
            } else {
                ((self.noise_counter & 0x04 != 0) ^ (self.noise_counter & 0x01 != 0))
                    || self.noise_counter == 0
            };
        }

        self.clock_enable = self.div_counter == self.audf;

        if self.div_counter == self.audf || self.div_counter == 0x1F {
            self.div_counter = 0;
        } else {
            self.div_counter += 1;
        }
    }

    /// Shift the counters and return the channel output level (0-15).
    pub fn phase1(&mut self) -> u8 {
        if self.clock_enable {
            let pulse_feedback = match self.audc >> 2 {
                0x00 => {
                    ((self.pulse_counter & 0x02 != 0) ^ (self.pulse_counter & 0x01 != 0))
                        && self.pulse_counter != 0x0A
                        && self.audc & 0x03 != 0
                }
                0x01 => self.pulse_counter & 0x08 == 0,
                0x02 => !self.noise_counter_bit4,
                _ => !(self.pulse_counter & 0x02 != 0 || self.pulse_counter & 0x0E == 0),
            };

            self.noise_counter >>= 1;
            if self.noise_feedback {
                self.noise_counter |= 0x10;
            }

            if !self.pulse_counter_hold {
                self.pulse_counter = !(self.pulse_counter >> 1) & 0x07;
                if pulse_feedback {
                    self.pulse_counter |= 0x08;
                }
            }
        }

        (self.pulse_counter & 0x01) * self.audv
    }

    fn save(&self, s: &mut Serializer) {
        s.put_u8(self.audc);
        s.put_u8(self.audf);
        s.put_u8(self.audv);
        s.put_bool(self.clock_enable);
        s.put_bool(self.noise_feedback);
        s.put_bool(self.noise_counter_bit4);
        s.put_bool(self.pulse_counter_hold);
        s.put_u8(self.div_counter);
        s.put_u8(self.pulse_counter);
        s.put_u8(self.noise_counter);
    }

    fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        self.audc = s.get_u8()? & 0x0F;
        self.audf = s.get_u8()? & 0x1F;
        self.audv = s.get_u8()? & 0x0F;
        self.clock_enable = s.get_bool()?;
        self.noise_feedback = s.get_bool()?;
        self.noise_counter_bit4 = s.get_bool()?;
        self.pulse_counter_hold = s.get_bool()?;
        self.div_counter = s.get_u8()? & 0x1F;
        self.pulse_counter = s.get_u8()? & 0x0F;
        self.noise_counter = s.get_u8()? & 0x1F;
        Ok(())
    }
}

/// Both channels plus the resampler.
#[derive(Debug, Clone)]
pub(crate) struct Audio {
    pub channels: [AudioChannel; 2],
    accumulator: f32,
    sample_count: u32,
    samples_per_output: f32,
    buffer: Vec<f32>,
}

impl Audio {
    /// `clock_hz` is the colour clock rate, `output_rate` the rate handed
    /// to the host.
    pub fn new(clock_hz: u32, output_rate: u32) -> Self {
        let raw_rate = clock_hz as f32 / CLOCKS_PER_SAMPLE as f32;
        Self {
            channels: [AudioChannel::default(), AudioChannel::default()],
            accumulator: 0.0,
            sample_count: 0,
            samples_per_output: raw_rate / output_rate.max(1) as f32,
            buffer: Vec::with_capacity(output_rate as usize / 50 + 1),
        }
    }

    /// Run the audio phase that falls on horizontal clock `hclock`, if any.
    pub fn clock(&mut self, hclock: u8) {
        match hclock {
            9 | 81 => {
                self.channels[0].phase0();
                self.channels[1].phase0();
            }
            37 | 149 => {
                let left = self.channels[0].phase1();
                let right = self.channels[1].phase1();
                self.push(f32::from(left + right) / 30.0);
            }
            _ => {}
        }
    }

    fn push(&mut self, sample: f32) {
        self.accumulator += sample;
        self.sample_count += 1;
        if self.sample_count as f32 >= self.samples_per_output {
            self.buffer.push(self.accumulator / self.sample_count as f32);
            self.accumulator = 0.0;
            self.sample_count = 0;
        }
    }

    pub fn take_buffer(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.buffer)
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Channel registers and counters. The resampler restarts on load.
    pub fn save(&self, s: &mut Serializer) {
        for channel in &self.channels {
            channel.save(s);
        }
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        for channel in &mut self.channels {
            channel.load(s)?;
        }
        self.accumulator = 0.0;
        self.sample_count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_lines(audio: &mut Audio, lines: usize) {
        for _ in 0..lines {
            for hclock in 0..228u8 {
                audio.clock(hclock);
            }
        }
    }

    #[test]
    fn silent_at_zero_volume() {
        let mut audio = Audio::new(3_579_545, 44_100);
        audio.channels[0].audc = 0x04;
        run_lines(&mut audio, 100);
        let buf = audio.take_buffer();
        assert!(!buf.is_empty());
        assert!(buf.iter().all(|&s| s.abs() < f32::EPSILON));
    }

    #[test]
    fn square_wave_toggles() {
        let mut channel = AudioChannel {
            audc: 0x04,
            audv: 0x0F,
            ..AudioChannel::default()
        };
        let mut levels = Vec::new();
        for _ in 0..8 {
            channel.phase0();
            levels.push(channel.phase1());
        }
        assert!(levels.contains(&0));
        assert!(levels.contains(&15));
    }

    #[test]
    fn output_rate_is_respected() {
        let mut audio = Audio::new(3_579_545, 15_700);
        // 31.4 kHz raw over 262 lines is 524 raw samples
        run_lines(&mut audio, 262);
        let produced = audio.take_buffer().len();
        assert!((260..=264).contains(&produced), "{produced}");
    }

    #[test]
    fn mixed_sample_is_in_unit_range() {
        let mut audio = Audio::new(3_579_545, 31_400);
        for channel in &mut audio.channels {
            channel.audc = 0x04;
            channel.audv = 0x0F;
        }
        run_lines(&mut audio, 20);
        let buf = audio.take_buffer();
        assert!(buf.iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert!(buf.iter().any(|&s| s > 0.5));
    }
}
