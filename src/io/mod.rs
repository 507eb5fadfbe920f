// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

#[derive(Debug, Default)]
pub struct AudioInput {
    pub buffers: Vec<Vec<f32>>,
}

#[derive(Debug, Default)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioOutput {
    /// Output with `channels` buffers of `frames` samples each.
    pub fn with_shape(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }
}

/// Copy audio straight through; output channels without an input are cleared.
pub fn pass_through(input: &AudioInput, output: &mut AudioOutput) {
    for (ch, out) in output.buffers.iter_mut().enumerate() {
        match input.buffers.get(ch) {
            Some(inp) => {
                let n = out.len().min(inp.len());
                out[..n].copy_from_slice(&inp[..n]);
                out[n..].fill(0.0);
            }
            None => out.fill(0.0),
        }
    }
}
