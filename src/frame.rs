use std::time::Instant;

/// One tick of the render loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the first frame
    pub time: f64,
    /// Seconds since the previous frame
    pub delta: f64,
}

impl FrameInfo {
    pub fn new(number: u64, time: f64, delta: f64) -> Self {
        Self { number, time, delta }
    }

    pub fn delta_ms(&self) -> f64 {
        self.delta * 1000.0
    }
}

/// Wall-clock frame source for the windowed host
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let info = FrameInfo::new(
            self.frame_number,
            now.duration_since(self.start_time).as_secs_f64(),
            now.duration_since(self.last_frame_time).as_secs_f64(),
        );
        self.frame_number += 1;
        self.last_frame_time = now;
        Some(info)
    }
}

/// Deterministic frame source: `count` frames at a fixed rate. Frame 0 has a
/// full step of delta, like a real loop where time passed before the first draw.
#[derive(Debug, Clone)]
pub struct FixedFrames {
    step: f64,
    next: u64,
    count: u64,
}

impl FixedFrames {
    pub fn new(fps: f64, count: u64) -> Self {
        Self {
            step: 1.0 / fps.max(f64::EPSILON),
            next: 0,
            count,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Iterator for FixedFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        if self.next >= self.count {
            return None;
        }
        let number = self.next;
        self.next += 1;
        Some(FrameInfo::new(number, (number + 1) as f64 * self.step, self.step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FixedFrames {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_frames() {
        let frames: Vec<_> = FixedFrames::new(50.0, 3).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].number, 0);
        assert!((frames[2].time - 0.06).abs() < 1e-6);
        assert!(frames.iter().all(|f| (f.delta_ms() - 20.0).abs() < 1e-4));
    }

    #[test]
    fn test_fixed_frames_exact_size() {
        let mut frames = FixedFrames::new(60.0, 5);
        frames.next();
        assert_eq!(frames.len(), 4);
    }

    #[test]
    fn test_wall_clock_frames_count_up() {
        let mut frames = FrameIterator::new();
        let first = frames.next().unwrap();
        let second = frames.next().unwrap();
        assert_eq!((first.number, second.number), (0, 1));
        assert!(second.time >= first.time);
        assert_eq!(frames.frame_number(), 2);
    }
}
