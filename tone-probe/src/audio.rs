use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::{
    audio::{AudioBufferRef, SampleBuffer},
    codecs,
    errors::Error,
    formats::FormatReader,
    io::MediaSourceStream,
    probe::Hint,
};
use tracing::{debug, warn};

pub(crate) struct Decoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn codecs::Decoder>,
    track_id: u32,
}

impl Decoder {
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let src = std::fs::File::open(path).context("failed to open media")?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(ext);
        }

        let probe_data = symphonia::default::get_probe()
            .format(&hint, mss, &Default::default(), &Default::default())
            .context("unsupported format")?;
        let format = probe_data.format;

        // Try the default track first and then all other tracks
        let codecs = symphonia::default::get_codecs();
        let (decoder, track_id) = std::iter::once(format.default_track())
            .flatten()
            .chain(format.tracks().iter())
            .find_map(|track| {
                codecs
                    .make(&track.codec_params, &Default::default())
                    .ok()
                    .map(|d| (d, track.id))
            })
            .ok_or(anyhow::anyhow!("no compatible track found"))?;

        Ok(Self {
            format,
            decoder,
            track_id,
        })
    }

    pub(crate) fn sample_rate(&self) -> u32 {
        self.decoder.codec_params().sample_rate.unwrap_or_default()
    }

    /// Next decoded buffer of the selected track, `None` at the end of the stream.
    ///
    /// Corrupt packets are skipped, any other reader or decoder failure is returned.
    pub(crate) fn decode(&mut self) -> Result<Option<AudioBufferRef>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(err) if is_end_of_stream(&err) => return Ok(None),
                Err(err) => return Err(err).context("failed to read packet"),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(_) => {}
                Err(Error::DecodeError(err)) => {
                    warn!("Skipping packet {} because of decode error: {err}", packet.ts());
                    continue;
                }
                Err(err) => return Err(err).context("failed to decode packet"),
            }

            return Ok(Some(self.decoder.last_decoded()));
        }
    }

    /// Decode the whole track into mono samples
    pub(crate) fn read_mono(mut self) -> Result<Vec<f32>> {
        let mut samples = Vec::new();
        while let Some(audio_buf) = self.decode()? {
            let spec = *audio_buf.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(audio_buf);
            samples.extend(downmix(sample_buf.samples(), spec.channels.count()));
        }
        debug!(
            "Decoded {} samples at {} Hz",
            samples.len(),
            self.sample_rate()
        );
        Ok(samples)
    }
}

/// Format readers report the end of the media as an unexpected EOF
fn is_end_of_stream(err: &Error) -> bool {
    matches!(err, Error::IoError(io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof)
}

/// Average interleaved frames down to one channel
pub(crate) fn downmix(interleaved: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    let channels = channels.max(1);
    interleaved
        .chunks_exact(channels)
        .map(move |frame| frame.iter().sum::<f32>() / channels as f32)
}
