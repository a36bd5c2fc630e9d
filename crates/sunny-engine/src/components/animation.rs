//! Named sprite animations, selected by gameplay state.
//!
//! The engine only tracks which clip is active and which frame it is on;
//! turning the frame into pixels is the renderer's job.

use std::collections::HashMap;

/// A sequence of atlas cells played at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Atlas cells as (col, row).
    pub frames: Vec<(f32, f32)>,
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationClip {
    /// Consecutive columns on one atlas row.
    pub fn strip(row: f32, start_col: f32, frame_count: u32, fps: f32) -> Self {
        Self {
            frames: (0..frame_count).map(|i| (start_col + i as f32, row)).collect(),
            frame_duration: 1.0 / fps.max(f32::EPSILON),
            looping: true,
        }
    }

    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }
}

/// Clip set plus playback cursor for one entity.
#[derive(Debug, Clone, Default)]
pub struct AnimationComponent {
    clips: HashMap<String, AnimationClip>,
    current: String,
    frame: usize,
    timer: f32,
    playing: bool,
}

impl AnimationComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: impl Into<String>, clip: AnimationClip) -> Self {
        self.clips.insert(name.into(), clip);
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Switch to a clip. Re-selecting the active clip keeps its cursor.
    /// Unknown names are logged and ignored.
    pub fn play(&mut self, name: &str) {
        if self.current == name {
            self.playing = true;
            return;
        }
        if !self.clips.contains_key(name) {
            log::debug!("Animation '{}' not found, keeping '{}'", name, self.current);
            return;
        }
        self.current = name.to_string();
        self.frame = 0;
        self.timer = 0.0;
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    /// Atlas cell of the current frame.
    pub fn current_frame(&self) -> Option<(f32, f32)> {
        self.clips
            .get(&self.current)
            .and_then(|clip| clip.frames.get(self.frame).copied())
    }

    /// Advance playback. Returns true when the frame changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }
        let Some(clip) = self.clips.get(&self.current) else {
            return false;
        };
        if clip.frames.is_empty() || clip.frame_duration <= 0.0 {
            return false;
        }

        self.timer += dt;
        let mut changed = false;
        while self.timer >= clip.frame_duration {
            self.timer -= clip.frame_duration;
            changed = true;
            if self.frame + 1 < clip.frames.len() {
                self.frame += 1;
            } else if clip.looping {
                self.frame = 0;
            } else {
                self.playing = false;
                break;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_clips() -> AnimationComponent {
        AnimationComponent::new()
            .with_clip("idle", AnimationClip::strip(0.0, 0.0, 2, 5.0))
            .with_clip("walk", AnimationClip::strip(1.0, 0.0, 4, 10.0))
            .with_clip("hurt", AnimationClip::strip(2.0, 0.0, 2, 10.0).once())
    }

    #[test]
    fn play_switches_and_resets() {
        let mut anim = player_clips();
        anim.play("walk");
        anim.tick(0.15);
        assert_eq!(anim.frame_index(), 1);

        // Same clip keeps the cursor
        anim.play("walk");
        assert_eq!(anim.frame_index(), 1);

        anim.play("idle");
        assert_eq!(anim.current(), "idle");
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn unknown_clip_is_ignored() {
        let mut anim = player_clips();
        anim.play("idle");
        anim.play("swim");
        assert_eq!(anim.current(), "idle");
    }

    #[test]
    fn looping_wraps_and_once_stops() {
        let mut anim = player_clips();
        anim.play("walk");
        anim.tick(0.45);
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.current_frame(), Some((0.0, 1.0)));

        anim.play("hurt");
        anim.tick(0.5);
        assert_eq!(anim.frame_index(), 1);
        assert!(!anim.is_playing());
    }

    #[test]
    fn paused_clip_does_not_advance() {
        let mut anim = player_clips();
        anim.play("walk");
        anim.pause();
        assert!(!anim.tick(1.0));
        assert_eq!(anim.frame_index(), 0);
        anim.resume();
        assert!(anim.tick(0.1));
    }

    #[test]
    fn zero_length_frames_hold_still() {
        let frozen = AnimationClip {
            frames: vec![(0.0, 0.0), (1.0, 0.0)],
            frame_duration: 0.0,
            looping: true,
        };
        let mut anim = AnimationComponent::new().with_clip("frozen", frozen);
        anim.play("frozen");
        assert!(!anim.tick(1.0 / 60.0));
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.current_frame(), Some((0.0, 0.0)));
    }
}
