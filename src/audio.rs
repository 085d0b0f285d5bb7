//! Fire-and-forget sound output.
//!
//! The game only ever asks for "play this sound at this volume" and "loop the
//! music". Real output goes through rodio when the `audio` feature is enabled;
//! otherwise a silent sink just logs the requests.

use crate::config::GameConfig;
use crate::entities::GameEvent;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Laser,
    Explosion,
    Damage,
    Music,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Laser, Sound::Explosion, Sound::Damage, Sound::Music];

    /// File under `<assets>/audio/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Sound::Laser => "laser.wav",
            Sound::Explosion => "explosion.wav",
            Sound::Damage => "damage.wav",
            Sound::Music => "game_music.wav",
        }
    }

    pub fn volume(self) -> f32 {
        match self {
            Sound::Laser => 0.2,
            Sound::Explosion => 0.2,
            Sound::Damage => 0.4,
            Sound::Music => 0.1,
        }
    }
}

pub trait AudioSink {
    /// Play a one-shot effect. Failures are logged, never returned.
    fn play(&mut self, sound: Sound, volume: f32);

    /// Start the background track, looping forever.
    fn play_music(&mut self, volume: f32);
}

/// Discards every request.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, sound: Sound, volume: f32) {
        log::trace!("(silent) {:?} at {:.1}", sound, volume);
    }

    fn play_music(&mut self, volume: f32) {
        log::trace!("(silent) music at {:.1}", volume);
    }
}

/// Sounds for this frame's events.
pub fn react(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for event in events {
        let sound = match event {
            GameEvent::LaserFired => Sound::Laser,
            GameEvent::MeteorDestroyed { .. } => Sound::Explosion,
            GameEvent::PlayerHit { .. } => Sound::Damage,
            GameEvent::GameOver => continue,
        };
        sink.play(sound, sound.volume());
    }
}

/// The output device for this build: rodio with the `audio` feature (failing
/// if the device or a sound file is missing), silence without it.
pub fn open(config: &GameConfig) -> Result<Box<dyn AudioSink>> {
    #[cfg(feature = "audio")]
    {
        let sink = rodio_sink::RodioAudio::open(&config.asset_dir.join("audio"))?;
        Ok(Box::new(sink))
    }
    #[cfg(not(feature = "audio"))]
    {
        log::info!(
            "built without the audio feature; sounds under {} are not played",
            config.asset_dir.join("audio").display()
        );
        Ok(Box::new(SilentAudio))
    }
}

#[cfg(feature = "audio")]
mod rodio_sink {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::{AudioSink, Sound};
    use crate::assets::load_bytes;
    use crate::error::{GameError, Result};

    pub struct RodioAudio {
        /// Must outlive every sink.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        clips: HashMap<Sound, Arc<[u8]>>,
        music: Option<Sink>,
    }

    impl RodioAudio {
        pub fn open(dir: &Path) -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;

            let mut clips = HashMap::new();
            for sound in Sound::ALL {
                let bytes = load_bytes(&dir.join(sound.file_name()))?;
                clips.insert(sound, Arc::from(bytes));
            }
            log::info!("audio device opened, {} clips loaded", clips.len());

            Ok(Self {
                _stream: stream,
                handle,
                clips,
                music: None,
            })
        }

        fn decode(&self, sound: Sound) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
            let bytes = self
                .clips
                .get(&sound)
                .cloned()
                .ok_or_else(|| GameError::Audio(format!("{:?} not loaded", sound)))?;
            Decoder::new(Cursor::new(bytes)).map_err(|e| GameError::Audio(e.to_string()))
        }

        fn sink(&self, volume: f32) -> Result<Sink> {
            let sink = Sink::try_new(&self.handle).map_err(|e| GameError::Audio(e.to_string()))?;
            sink.set_volume(volume.clamp(0.0, 1.0));
            Ok(sink)
        }
    }

    impl AudioSink for RodioAudio {
        fn play(&mut self, sound: Sound, volume: f32) {
            let played = self.decode(sound).and_then(|source| {
                let sink = self.sink(volume)?;
                sink.append(source);
                sink.detach();
                Ok(())
            });
            if let Err(e) = played {
                log::warn!("cannot play {:?}: {}", sound, e);
            }
        }

        fn play_music(&mut self, volume: f32) {
            let started = self.decode(Sound::Music).and_then(|source| {
                let sink = self.sink(volume)?;
                sink.append(source.repeat_infinite());
                Ok(sink)
            });
            match started {
                Ok(sink) => self.music = Some(sink),
                Err(e) => log::warn!("cannot start music: {}", e),
            }
        }
    }
}
