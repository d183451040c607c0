use aaudio_out_engine::{AudioSource, Pull, SampleFormat, StreamFormat};
use byteorder::{ByteOrder, NativeEndian};
use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Sine generator that plays for a fixed duration, then reports end of stream.
pub struct ToneSource {
    frequency: f64,
    seconds: f64,
    amplitude: f64,
    format: Option<StreamFormat>,
    total_frames: u64,
    played_frames: u64,
    phase: f64,
    last_deadline: Arc<AtomicI64>,
}

impl ToneSource {
    pub fn new(frequency: f64, seconds: f64) -> Self {
        Self {
            frequency,
            seconds,
            amplitude: 0.25,
            format: None,
            total_frames: 0,
            played_frames: 0,
            phase: 0.0,
            last_deadline: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Deadline passed with the most recent read, in monotonic nanoseconds.
    pub fn deadline_probe(&self) -> Arc<AtomicI64> {
        Arc::clone(&self.last_deadline)
    }

    fn write_sample(format: SampleFormat, dst: &mut [u8], value: f64) {
        match format {
            SampleFormat::S16 => NativeEndian::write_i16(dst, (value * i16::MAX as f64) as i16),
            SampleFormat::S32 => NativeEndian::write_i32(dst, (value * i32::MAX as f64) as i32),
            SampleFormat::Float => NativeEndian::write_f32(dst, value as f32),
            _ => dst.fill(0),
        }
    }
}

impl AudioSource for ToneSource {
    fn prepare(&mut self, format: &StreamFormat) {
        // Keep position across reloads; only the length depends on the rate.
        self.total_frames = (self.seconds * format.sample_rate as f64) as u64;
        self.format = Some(format.clone());
    }

    fn read(&mut self, buf: &mut [u8], frames: usize, deadline_ns: i64) -> Pull {
        self.last_deadline.store(deadline_ns, Ordering::Relaxed);
        let Some(format) = &self.format else {
            buf.fill(0);
            return Pull {
                frames: 0,
                eof: false,
            };
        };

        let sample_bytes = format.format.bytes();
        let frame_bytes = format.frame_bytes();
        let remaining = self.total_frames.saturating_sub(self.played_frames);
        let frames_out = frames.min(remaining as usize);
        let step = TAU * self.frequency / format.sample_rate as f64;

        for (i, frame) in buf.chunks_exact_mut(frame_bytes).enumerate() {
            let value = if i < frames_out {
                self.amplitude * self.phase.sin()
            } else {
                0.0
            };
            for sample in frame.chunks_exact_mut(sample_bytes) {
                Self::write_sample(format.format, sample, value);
            }
            if i < frames_out {
                self.phase = (self.phase + step) % TAU;
            }
        }

        self.played_frames += frames_out as u64;
        Pull {
            frames: frames_out,
            eof: self.played_frames >= self.total_frames,
        }
    }
}
