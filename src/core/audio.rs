// FILE: src/core/audio.rs
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use log::{debug, error, info, warn};
use std::f32::consts::TAU;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

const CUE_SECONDS: f32 = 0.3;
const CUE_DECAY_PER_SECOND: f32 = 12.0;

/// A pre-rendered, interleaved f32 buffer at the output device's rate.
pub type Cue = Arc<Vec<f32>>;

/// The sound side of the game. The core only asks for a pitch to be rendered
/// and played; waveform generation and device handling live behind this trait.
pub trait AudioBackend {
    /// Renders the cue for `pitch`, or `None` when sound is unavailable.
    fn render_cue(&self, pitch: u8) -> Option<Cue>;
    fn play_cue(&self, cue: &Cue);
}

/// Used when audio is disabled or no output device could be opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn render_cue(&self, _pitch: u8) -> Option<Cue> {
        None
    }

    fn play_cue(&self, _cue: &Cue) {}
}

// --- Engine Commands ---
enum AudioCommand {
    PlayCue(Cue),
}

pub struct CpalAudio {
    command_sender: Sender<AudioCommand>,
    sample_rate: u32,
    channels: usize,
    volume: f32,
}

impl CpalAudio {
    /// Opens the default output device on a dedicated thread. Returns an error
    /// if the device or stream could not be set up; callers fall back to silence.
    pub fn init(volume: f32) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "no audio output device".to_string())?;
        let config = device
            .default_output_config()
            .map_err(|e| format!("no default audio config: {}", e))?;
        let stream_config: StreamConfig = config.into();

        let sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;

        let (command_sender, command_receiver) = channel();
        let (ready_sender, ready_receiver) = channel();

        thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || audio_manager_thread(command_receiver, stream_config, ready_sender))
            .map_err(|e| format!("failed to spawn audio thread: {}", e))?;

        ready_receiver
            .recv()
            .map_err(|_| "audio thread exited during startup".to_string())??;

        info!("Audio engine initialized ({} Hz, {} ch).", sample_rate, channels);
        Ok(Self {
            command_sender,
            sample_rate,
            channels,
            volume: volume.clamp(0.0, 1.0),
        })
    }
}

impl AudioBackend for CpalAudio {
    fn render_cue(&self, pitch: u8) -> Option<Cue> {
        if pitch > 127 {
            return None;
        }
        Some(Arc::new(render_tone(
            pitch,
            self.sample_rate,
            self.channels,
            self.volume,
        )))
    }

    fn play_cue(&self, cue: &Cue) {
        if self
            .command_sender
            .send(AudioCommand::PlayCue(cue.clone()))
            .is_err()
        {
            warn!("Audio thread is gone; dropping cue.");
        }
    }
}

/// Equal-tempered frequency for a MIDI pitch (A4 = 69 = 440 Hz).
#[inline(always)]
pub fn pitch_to_frequency(pitch: u8) -> f32 {
    440.0 * 2f32.powf((pitch as f32 - 69.0) / 12.0)
}

/// Decaying sine, duplicated across all output channels.
fn render_tone(pitch: u8, sample_rate: u32, channels: usize, volume: f32) -> Vec<f32> {
    let frequency = pitch_to_frequency(pitch);
    let frames = (CUE_SECONDS * sample_rate as f32) as usize;
    let channels = channels.max(1);
    let mut samples = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (TAU * frequency * t).sin() * (-CUE_DECAY_PER_SECOND * t).exp() * volume;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    debug!("Rendered cue for pitch {} ({} frames)", pitch, frames);
    samples
}

/// Owns the cpal stream for its whole lifetime and forwards cues into the
/// real-time callback. Exits when the `CpalAudio` handle is dropped.
fn audio_manager_thread(
    command_receiver: Receiver<AudioCommand>,
    stream_config: StreamConfig,
    ready: Sender<Result<(), String>>,
) {
    let host = cpal::default_host();
    let Some(device) = host.default_output_device() else {
        let _ = ready.send(Err("no audio output device".to_string()));
        return;
    };

    let (cue_sender, cue_receiver) = channel::<Cue>();
    let mut active_cues: Vec<(Cue, usize)> = Vec::new();

    let stream = match device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for cue in cue_receiver.try_iter() {
                active_cues.push((cue, 0));
            }
            mix_cues(data, &mut active_cues);
        },
        |err| error!("Audio stream error: {}", err),
        None,
    ) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(format!("failed to build audio stream: {}", e)));
            return;
        }
    };
    if let Err(e) = stream.play() {
        let _ = ready.send(Err(format!("failed to start audio stream: {}", e)));
        return;
    }
    let _ = ready.send(Ok(()));

    while let Ok(command) = command_receiver.recv() {
        match command {
            AudioCommand::PlayCue(cue) => {
                let _ = cue_sender.send(cue);
            }
        }
    }
    info!("Audio thread shutting down.");
}

/// Sums every playing cue into `out`, dropping cues that have finished.
fn mix_cues(out: &mut [f32], active: &mut Vec<(Cue, usize)>) {
    out.fill(0.0);
    active.retain_mut(|(data, cursor)| {
        let count = (data.len() - *cursor).min(out.len());
        for (slot, sample) in out.iter_mut().zip(&data[*cursor..*cursor + count]) {
            *slot += *sample;
        }
        *cursor += count;
        *cursor < data.len()
    });
    for sample in out.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}
