// src/tables/io.rs
// On-disk forms of the packed tables: readable JSON and a compact u16-packed
// little-endian binary.
//
// Binary layout:
//   magic: 8 bytes = "LXSMDFA1"
//   u32:   n_states
//   u32:   start
//   u16:   next[n_states * 256]   // 0xFFFF = dead
//   i16:   stops[n_states]        // 0 = not accepting

use std::io::{BufWriter, Write};

use super::Tables;
use crate::dfa::{ALPHABET, DEAD};

const BIN_MAGIC: &[u8; 8] = b"LXSMDFA1";
const DEAD_U16: u16 = 0xFFFF;

// -------------------- JSON --------------------

pub fn save_tables_json(path: &std::path::Path, t: &Tables) -> std::io::Result<()> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, t)?;
    w.flush()
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<Tables, String> {
    serde_json::from_slice::<Tables>(data).map_err(|e| format!("failed to parse tables JSON: {e}"))
}

// -------------------- Compact binary --------------------

pub fn save_tables_bin(path: &std::path::Path, t: &Tables) -> std::io::Result<()> {
    if t.n_states >= DEAD_U16 as u32 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("n_states={} exceeds u16 packing", t.n_states),
        ));
    }
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);

    w.write_all(BIN_MAGIC)?;
    w.write_all(&t.n_states.to_le_bytes())?;
    w.write_all(&t.start.to_le_bytes())?;

    let mut bytes = vec![0u8; t.next.len() * 2];
    for (i, &to) in t.next.iter().enumerate() {
        let v = if to == DEAD {
            DEAD_U16
        } else {
            u16::try_from(to).map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "next entry > u16 range")
            })?
        };
        bytes[i * 2..i * 2 + 2].copy_from_slice(&v.to_le_bytes());
    }
    w.write_all(&bytes)?;

    let mut bytes = vec![0u8; t.stops.len() * 2];
    for (i, &stop) in t.stops.iter().enumerate() {
        let v = i16::try_from(stop).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "stop id > i16 range")
        })?;
        bytes[i * 2..i * 2 + 2].copy_from_slice(&v.to_le_bytes());
    }
    w.write_all(&bytes)?;

    w.flush()
}

pub fn load_tables_bin_bytes(mut data: &[u8]) -> Result<Tables, String> {
    if data.len() < 8 + 4 + 4 {
        return Err("tables .bin too short".into());
    }
    if &data[..8] != BIN_MAGIC {
        return Err("bad magic in tables .bin".into());
    }
    data = &data[8..];

    let read_u32 = |buf: &mut &[u8]| -> Result<u32, String> {
        if buf.len() < 4 {
            return Err("truncated u32".into());
        }
        let mut le = [0u8; 4];
        le.copy_from_slice(&buf[..4]);
        *buf = &buf[4..];
        Ok(u32::from_le_bytes(le))
    };
    let read_u16 = |buf: &mut &[u8]| -> Result<u16, String> {
        if buf.len() < 2 {
            return Err("truncated u16".into());
        }
        let mut le = [0u8; 2];
        le.copy_from_slice(&buf[..2]);
        *buf = &buf[2..];
        Ok(u16::from_le_bytes(le))
    };

    let n_states = read_u32(&mut data)?;
    let start = read_u32(&mut data)?;
    if start >= n_states.max(1) {
        return Err(format!("start state {start} out of range"));
    }

    let entries = (n_states as usize)
        .checked_mul(ALPHABET)
        .ok_or("n_states overflow")?;
    let mut next = Vec::with_capacity(entries);
    for _ in 0..entries {
        let v = read_u16(&mut data)?;
        next.push(if v == DEAD_U16 { DEAD } else { v as u32 });
    }

    let mut stops = Vec::with_capacity(n_states as usize);
    for _ in 0..n_states {
        stops.push(read_u16(&mut data)? as i16 as i32);
    }

    Ok(Tables {
        n_states,
        start,
        next,
        stops,
    })
}
