use crate::io::midi::MidiEvent;

const PITCH_BEND_CENTER: i16 = 8192;

/// Decode one short MIDI message from raw bytes.
///
/// Returns `None` for running status, truncated messages and SysEx, none of
/// which fit in a fixed three-byte event.
pub fn decode(bytes: &[u8]) -> Option<MidiEvent> {
    let status = *bytes.first()?;
    if status < 0x80 {
        return None;
    }

    if status >= 0xF0 {
        if status == 0xF0 || bytes.len() > 3 {
            return None;
        }
        let mut raw = [0u8; 3];
        raw[..bytes.len()].copy_from_slice(bytes);
        return Some(MidiEvent::Other {
            bytes: raw,
            len: bytes.len() as u8,
        });
    }

    let channel = (status & 0x0F) + 1;
    let data1 = bytes.get(1).map(|b| b & 0x7F);
    let data2 = bytes.get(2).map(|b| b & 0x7F);

    let event = match status & 0xF0 {
        0x80 => MidiEvent::NoteOff {
            channel,
            key: data1?,
            velocity: data2?,
        },
        0x90 => MidiEvent::NoteOn {
            channel,
            key: data1?,
            velocity: data2?,
        },
        0xA0 => MidiEvent::PolyPressure {
            channel,
            key: data1?,
            pressure: data2?,
        },
        0xB0 => MidiEvent::ControlChange {
            channel,
            controller: data1?,
            value: data2?,
        },
        0xC0 => MidiEvent::ProgramChange {
            channel,
            program: data1?,
        },
        0xD0 => MidiEvent::ChannelPressure {
            channel,
            pressure: data1?,
        },
        _ => {
            let raw = (data1? as i16) | ((data2? as i16) << 7);
            MidiEvent::PitchBend {
                channel,
                value: raw - PITCH_BEND_CENTER,
            }
        }
    };
    Some(event)
}

/// Encode an event into its wire bytes. Returns the buffer and used length.
pub fn encode(event: &MidiEvent) -> ([u8; 3], usize) {
    let status = |kind: u8, channel: u8| kind | (channel.saturating_sub(1) & 0x0F);

    match *event {
        MidiEvent::NoteOff {
            channel,
            key,
            velocity,
        } => ([status(0x80, channel), key & 0x7F, velocity & 0x7F], 3),
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } => ([status(0x90, channel), key & 0x7F, velocity & 0x7F], 3),
        MidiEvent::PolyPressure {
            channel,
            key,
            pressure,
        } => ([status(0xA0, channel), key & 0x7F, pressure & 0x7F], 3),
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        } => ([status(0xB0, channel), controller & 0x7F, value & 0x7F], 3),
        MidiEvent::ProgramChange { channel, program } => {
            ([status(0xC0, channel), program & 0x7F, 0], 2)
        }
        MidiEvent::ChannelPressure { channel, pressure } => {
            ([status(0xD0, channel), pressure & 0x7F, 0], 2)
        }
        MidiEvent::PitchBend { channel, value } => {
            let raw = (value.clamp(-PITCH_BEND_CENTER, PITCH_BEND_CENTER - 1) + PITCH_BEND_CENTER)
                as u16;
            (
                [status(0xE0, channel), (raw & 0x7F) as u8, (raw >> 7) as u8],
                3,
            )
        }
        MidiEvent::Other { bytes, len } => (bytes, len as usize),
    }
}
