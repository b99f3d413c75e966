//! cpal-backed native client with a ring of output buffers

use crate::config::ClientConfig;
use crate::device::{default_output_device, find_device_by_name};
use crate::error::{CpalClientError, Result};
use crate::render::Renderer;
use crate::ring::{buffer_ring, BufferRing, RingEnds};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig, SupportedBufferSize};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use outport_core::{ClientFactory, NativeClient, OutputBuffer, StreamInfo};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the caller waits for the audio thread to answer a command
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Commands sent to the audio thread
enum AudioCommand {
    /// Build and start the output stream
    Activate { reply: Sender<Result<()>> },
    /// Stop and drop the output stream
    Deactivate { reply: Sender<Result<()>> },
    /// Shutdown the audio thread
    Shutdown,
}

/// Caller end of the audio thread's command channel
struct AudioThreadLink {
    command_tx: Sender<AudioCommand>,
    timeout: Duration,
}

impl AudioThreadLink {
    /// Send a command and wait for the audio thread's answer
    fn request(&self, make: impl FnOnce(Sender<Result<()>>) -> AudioCommand) -> Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        self.command_tx
            .send(make(reply_tx))
            .map_err(|_| CpalClientError::AudioThreadGone)?;

        match reply_rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CpalClientError::CommandTimeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(CpalClientError::AudioThreadGone),
        }
    }

    /// Start the stream
    ///
    /// If the audio thread answers too late, a stream it may still build is
    /// torn down again so the caller's view (not active) stays true.
    fn activate(&self) -> Result<()> {
        let result = self.request(|reply| AudioCommand::Activate { reply });

        if let Err(CpalClientError::CommandTimeout(timeout)) = &result {
            tracing::warn!(
                "Audio thread did not start the stream within {:?}, rolling back",
                timeout
            );
            let (reply, _) = bounded(1);
            let _ = self.command_tx.send(AudioCommand::Deactivate { reply });
        }

        result
    }

    fn deactivate(&self) -> Result<()> {
        self.request(|reply| AudioCommand::Deactivate { reply })
    }

    fn shutdown(&self) {
        let _ = self.command_tx.send(AudioCommand::Shutdown);
    }
}

/// cpal native audio client
///
/// **Architecture**: a dedicated audio thread owns the cpal `Stream` (which
/// is not `Send` on every platform). The caller talks to it over a command
/// channel. Audio itself travels through a fixed ring of [`OutputBuffer`]s:
/// the caller takes a free buffer, fills it and queues it; the stream
/// callback plays queued buffers and returns them to the free ring.
pub struct CpalClient {
    link: AudioThreadLink,
    audio_thread: Option<JoinHandle<()>>,
    ring: BufferRing,
    info: StreamInfo,
    device_name: String,
}

impl CpalClient {
    /// Open the configured device and spawn the audio thread
    ///
    /// The stream is not started until [`NativeClient::activate`].
    pub fn open(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let device = match config.device_name.as_deref() {
            Some(name) => find_device_by_name(config.backend, name)?,
            None => default_output_device(config.backend)?,
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let stream_config = find_stream_config(&device, config)?;
        let channels = stream_config.channels as usize;

        let info = StreamInfo::new(
            stream_config.sample_rate,
            stream_config.channels,
            config.chunk_frames,
        );

        let (ring, ends) = buffer_ring(
            channels,
            config.chunk_frames,
            config.ring_size,
            config.exchange_timeout(),
        );

        let (command_tx, command_rx) = bounded::<AudioCommand>(8);
        let audio_thread = thread::Builder::new()
            .name(format!("{}-audio", config.client_name))
            .spawn(move || {
                audio_thread_run(device, stream_config, ends, command_rx);
            })?;

        tracing::info!(
            "Opened audio device \"{}\": rate={}, ch={}, chunk={}, ring={}",
            device_name,
            info.sample_rate,
            info.channels,
            info.chunk_frames,
            config.ring_size,
        );

        Ok(Self {
            link: AudioThreadLink {
                command_tx,
                timeout: COMMAND_TIMEOUT,
            },
            audio_thread: Some(audio_thread),
            ring,
            info,
            device_name,
        })
    }

    /// Negotiated sample rate
    pub fn sample_rate(&self) -> u32 {
        self.info.sample_rate
    }

    /// Output channel count
    pub fn channels(&self) -> u16 {
        self.info.channels
    }

    /// Frames per output buffer
    pub fn chunk_frames(&self) -> usize {
        self.info.chunk_frames
    }

    /// Callbacks that had to pad with silence while audio was still expected
    pub fn underruns(&self) -> u64 {
        self.ring.underruns()
    }

    /// Name of the opened device
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Queue the held buffer and block until everything queued has played
    ///
    /// Only meaningful while the stream is active. The silence that follows
    /// is not counted as underruns; queueing a new buffer resumes counting.
    pub fn drain(&mut self) -> Result<()> {
        self.ring.drain()
    }
}

impl NativeClient for CpalClient {
    fn activate(&mut self) -> outport_core::Result<StreamInfo> {
        self.link.activate()?;
        Ok(self.info)
    }

    fn current_output_buffer(&mut self) -> outport_core::Result<&mut OutputBuffer> {
        Ok(self.ring.current()?)
    }

    fn send_and_get_output_buffer(&mut self) -> outport_core::Result<&mut OutputBuffer> {
        Ok(self.ring.send_and_next()?)
    }

    fn deactivate(&mut self) -> outport_core::Result<()> {
        self.link.deactivate()?;
        tracing::debug!(
            "Stream on \"{}\" stopped after {} underruns",
            self.device_name,
            self.underruns()
        );
        Ok(())
    }

    fn dispose(mut self) -> outport_core::Result<()> {
        self.link.shutdown();
        if let Some(handle) = self.audio_thread.take() {
            handle
                .join()
                .map_err(|_| outport_core::ClientError::stream("audio thread panicked"))?;
        }
        tracing::debug!("Released audio device \"{}\"", self.device_name);
        Ok(())
    }
}

impl Drop for CpalClient {
    fn drop(&mut self) {
        if self.audio_thread.is_some() {
            self.link.shutdown();
            // Audio thread will exit and join handle will be dropped
        }
    }
}

/// Audio thread main loop
///
/// Owns the device and, while active, the stream. Each activation builds a
/// fresh stream with a fresh renderer over the shared ring.
fn audio_thread_run(
    device: Device,
    config: StreamConfig,
    ends: RingEnds,
    command_rx: Receiver<AudioCommand>,
) {
    let mut stream: Option<Stream> = None;

    while let Ok(cmd) = command_rx.recv() {
        match cmd {
            AudioCommand::Activate { reply } => {
                let result = if stream.is_some() {
                    Err(CpalClientError::AlreadyActive)
                } else {
                    build_stream(&device, &config, ends.renderer()).map(|s| {
                        stream = Some(s);
                    })
                };
                let _ = reply.send(result);
            }
            AudioCommand::Deactivate { reply } => {
                stop_stream(stream.take(), |s| s.pause().map_err(CpalClientError::from));
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Shutdown => {
                stop_stream(stream.take(), |s| s.pause().map_err(CpalClientError::from));
                break;
            }
        }
    }
}

/// Pause and drop a stream
///
/// The stream is gone afterwards whatever `pause` reports, so a pause
/// failure is only logged. Stopping when nothing runs is a no-op.
fn stop_stream<S>(stream: Option<S>, pause: impl FnOnce(&S) -> Result<()>) {
    let Some(stream) = stream else {
        tracing::debug!("No output stream running");
        return;
    };

    if let Err(e) = pause(&stream) {
        tracing::warn!("Failed to pause output stream, dropping it anyway: {}", e);
    }
    drop(stream);
}

fn build_stream(device: &Device, config: &StreamConfig, mut renderer: Renderer) -> Result<Stream> {
    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            renderer.render(data);
        },
        |err| tracing::error!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Find an `f32` output configuration matching the client config
fn find_stream_config(device: &Device, config: &ClientConfig) -> Result<StreamConfig> {
    let default_config = device.default_output_config()?;
    let default_rate = default_config.sample_rate();
    let channels = wanted_channels(config.channels, default_config.channels());

    for supported in device.supported_output_configs()? {
        if supported.sample_format() != SampleFormat::F32 || supported.channels() != channels {
            continue;
        }

        let min_rate = supported.min_sample_rate();
        let max_rate = supported.max_sample_rate();

        let target_rate = if config.sample_rate == 0 {
            preferred_rate(default_rate, min_rate, max_rate)
        } else if (min_rate..=max_rate).contains(&config.sample_rate) {
            config.sample_rate
        } else {
            continue;
        };

        let buffer_size = match supported.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                let frames = u32::try_from(config.chunk_frames).unwrap_or(u32::MAX);
                BufferSize::Fixed(frames.clamp(*min, *max))
            }
            SupportedBufferSize::Unknown => BufferSize::Default,
        };

        return Ok(StreamConfig {
            channels,
            sample_rate: target_rate,
            buffer_size,
        });
    }

    Err(CpalClientError::UnsupportedConfig(format!(
        "no f32 output with {} channels at {} Hz",
        channels, config.sample_rate
    )))
}

/// Requested channel count, 0 meaning the device default
fn wanted_channels(requested: u16, device_default: u16) -> u16 {
    if requested == 0 {
        device_default
    } else {
        requested
    }
}

/// Device default rate when in range, otherwise 48 kHz, 44.1 kHz or the minimum
fn preferred_rate(default_rate: u32, min_rate: u32, max_rate: u32) -> u32 {
    [default_rate, 48_000, 44_100]
        .into_iter()
        .find(|rate| (min_rate..=max_rate).contains(rate))
        .unwrap_or(min_rate)
}

/// Factory producing [`CpalClient`]s from a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct CpalClientFactory {
    config: ClientConfig,
}

impl CpalClientFactory {
    /// Create a factory
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for CpalClientFactory {
    type Client = CpalClient;

    fn create(&mut self) -> outport_core::Result<CpalClient> {
        Ok(CpalClient::open(&self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn link(timeout: Duration) -> (AudioThreadLink, Receiver<AudioCommand>) {
        let (command_tx, command_rx) = bounded(8);
        (AudioThreadLink { command_tx, timeout }, command_rx)
    }

    #[test]
    fn preferred_rate_uses_device_default_when_supported() {
        assert_eq!(preferred_rate(96_000, 8_000, 192_000), 96_000);
        assert_eq!(preferred_rate(22_050, 44_100, 48_000), 48_000);
        assert_eq!(preferred_rate(22_050, 44_100, 44_100), 44_100);
        assert_eq!(preferred_rate(8_000, 88_200, 96_000), 88_200);
    }

    #[test]
    fn zero_channels_follows_device_default() {
        assert_eq!(wanted_channels(0, 2), 2);
        assert_eq!(wanted_channels(0, 6), 6);
        assert_eq!(wanted_channels(1, 2), 1);
    }

    #[test]
    fn late_activate_reply_is_a_timeout_and_rolls_back() {
        let (link, command_rx) = link(Duration::from_millis(20));

        let audio_thread = thread::spawn(move || {
            let Ok(AudioCommand::Activate { reply }) = command_rx.recv() else {
                panic!("expected activate");
            };
            thread::sleep(Duration::from_millis(100));
            let _ = reply.send(Ok(()));

            matches!(
                command_rx.recv_timeout(Duration::from_secs(2)),
                Ok(AudioCommand::Deactivate { .. })
            )
        });

        let err = link.activate().unwrap_err();
        assert!(matches!(err, CpalClientError::CommandTimeout(_)));
        assert!(
            audio_thread.join().unwrap(),
            "late stream is stopped again"
        );
    }

    #[test]
    fn missing_audio_thread_is_reported() {
        let (link, command_rx) = link(Duration::from_millis(20));

        // Thread answers by dropping the reply channel
        let audio_thread = thread::spawn(move || {
            let _ = command_rx.recv();
        });
        let err = link.deactivate().unwrap_err();
        assert!(matches!(err, CpalClientError::AudioThreadGone));
        audio_thread.join().unwrap();

        // Channel closed
        let err = link.deactivate().unwrap_err();
        assert!(matches!(err, CpalClientError::AudioThreadGone));
    }

    #[test]
    fn failed_pause_still_drops_the_stream() {
        struct FakeStream(Arc<AtomicBool>);
        impl Drop for FakeStream {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        stop_stream(Some(FakeStream(Arc::clone(&dropped))), |_| {
            Err(CpalClientError::PauseError("device unplugged".into()))
        });
        assert!(dropped.load(Ordering::SeqCst));

        // Nothing running is fine too
        stop_stream(None::<FakeStream>, |_| Ok(()));
    }

    #[test]
    fn open_rejects_invalid_config() {
        let config = ClientConfig::default().with_ring_size(0);
        assert!(matches!(
            CpalClient::open(&config),
            Err(CpalClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn open_default_device() {
        // This test might fail in CI without audio devices
        match CpalClient::open(&ClientConfig::default()) {
            Ok(client) => {
                assert!(client.sample_rate() > 0);
                assert_eq!(client.chunk_frames(), 1024);
                assert_eq!(client.underruns(), 0);
                assert!(client.dispose().is_ok());
            }
            Err(
                CpalClientError::Backend(_)
                | CpalClientError::Device(_)
                | CpalClientError::UnsupportedConfig(_)
                | CpalClientError::CpalError(_),
            ) => {
                // Expected in headless environments
            }
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
