//! Builders for raw Slippi byte streams.
//!
//! Offsets mirror the wire layout. Every builder writes full-length events unless
//! told otherwise, so the payload table from [`StreamBuilder::standard_payloads`]
//! matches them.

#![allow(dead_code)]

use slippstream::events::{game_start, item_update, post_frame, pre_frame};

pub const GAME_START: u8 = 0x36;
pub const PRE_FRAME: u8 = 0x37;
pub const POST_FRAME: u8 = 0x38;
pub const GAME_END: u8 = 0x39;
pub const FRAME_START: u8 = 0x3a;
pub const ITEM_UPDATE: u8 = 0x3b;
pub const FRAME_BOOKEND: u8 = 0x3c;

/// In-match id of Battlefield.
pub const BATTLEFIELD: u16 = 0x1f;
/// In-match id of Final Destination.
pub const FINAL_DESTINATION: u16 = 0x20;

fn put_f32(bytes: &mut [u8], offset: usize, value: f32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_i32(bytes: &mut [u8], offset: usize, value: i32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// One Post-Frame Update.
#[derive(Debug, Clone, Copy)]
pub struct PostFrame {
    pub frame: i32,
    /// 0-based wire slot.
    pub slot: u8,
    pub partner: bool,
    pub character: u8,
    pub action: u16,
    pub x: f32,
    pub y: f32,
    pub percent: f32,
    pub stock: u8,
    pub action_frame: f32,
    pub airborne: u8,
}

impl Default for PostFrame {
    fn default() -> Self {
        Self {
            frame: -123,
            slot: 0,
            partner: false,
            character: 0x01,
            action: 0x0E,
            x: 0.0,
            y: 0.0,
            percent: 0.0,
            stock: 4,
            action_frame: 1.0,
            airborne: 0,
        }
    }
}

impl PostFrame {
    pub fn at(frame: i32, slot: u8) -> Self {
        Self {
            frame,
            slot,
            ..Self::default()
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; post_frame::FULL_LEN];
        bytes[0] = POST_FRAME;
        put_i32(&mut bytes, 0x01, self.frame);
        bytes[0x05] = self.slot;
        bytes[0x06] = u8::from(self.partner);
        bytes[0x07] = self.character;
        put_u16(&mut bytes, 0x08, self.action);
        put_f32(&mut bytes, 0x0A, self.x);
        put_f32(&mut bytes, 0x0E, self.y);
        put_f32(&mut bytes, 0x12, 1.0);
        put_f32(&mut bytes, 0x16, self.percent);
        put_f32(&mut bytes, 0x1A, 60.0);
        bytes[0x21] = self.stock;
        put_f32(&mut bytes, 0x22, self.action_frame);
        bytes[0x2F] = self.airborne;
        bytes[0x32] = 2;
        bytes
    }
}

/// One Pre-Frame Update.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreFrame {
    pub frame: i32,
    pub slot: u8,
    pub partner: bool,
    pub main_x: f32,
    pub main_y: f32,
    pub buttons: u16,
}

impl PreFrame {
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; pre_frame::FULL_LEN];
        bytes[0] = PRE_FRAME;
        put_i32(&mut bytes, 0x01, self.frame);
        bytes[0x05] = self.slot;
        bytes[0x06] = u8::from(self.partner);
        put_f32(&mut bytes, 0x19, self.main_x);
        put_f32(&mut bytes, 0x1D, self.main_y);
        put_u16(&mut bytes, 0x31, self.buttons);
        bytes
    }
}

/// One Item Update.
pub fn item(kind: u16, subtype: u8, owner: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; item_update::FULL_LEN];
    bytes[0] = ITEM_UPDATE;
    put_u16(&mut bytes, 0x05, kind);
    bytes[0x07] = subtype;
    put_f32(&mut bytes, 0x1E, 3.0);
    bytes[0x2A] = owner;
    bytes
}

/// Builds an event stream by appending events in order.
#[derive(Debug, Clone, Default)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A Payloads event registering the given `(command, payload length)` pairs.
    pub fn payloads(mut self, entries: &[(u8, u16)]) -> Self {
        self.bytes.push(0x35);
        self.bytes.push((entries.len() * 3 + 1) as u8);
        for (command, len) in entries {
            self.bytes.push(*command);
            self.bytes.extend_from_slice(&len.to_be_bytes());
        }
        self
    }

    /// A Payloads event matching every builder in this module.
    pub fn standard_payloads(self) -> Self {
        self.payloads(&[
            (GAME_START, (game_start::FULL_LEN - 1) as u16),
            (PRE_FRAME, (pre_frame::FULL_LEN - 1) as u16),
            (POST_FRAME, (post_frame::FULL_LEN - 1) as u16),
            (GAME_END, 1),
            (FRAME_START, 8),
            (ITEM_UPDATE, (item_update::FULL_LEN - 1) as u16),
            (FRAME_BOOKEND, 8),
        ])
    }

    pub fn game_start(mut self, version: (u8, u8, u8), stage: u16) -> Self {
        let mut bytes = vec![0u8; game_start::FULL_LEN];
        bytes[0] = GAME_START;
        bytes[1] = version.0;
        bytes[2] = version.1;
        bytes[3] = version.2;
        put_u16(&mut bytes, 0x13, stage);
        self.bytes.extend(bytes);
        self
    }

    pub fn pre(mut self, event: PreFrame) -> Self {
        self.bytes.extend(event.bytes());
        self
    }

    pub fn post(mut self, event: PostFrame) -> Self {
        self.bytes.extend(event.bytes());
        self
    }

    pub fn item(mut self, kind: u16, subtype: u8, owner: u8) -> Self {
        self.bytes.extend(item(kind, subtype, owner));
        self
    }

    pub fn frame_start(mut self, frame: i32) -> Self {
        self.bytes.push(FRAME_START);
        self.bytes.extend_from_slice(&frame.to_be_bytes());
        self.bytes.extend_from_slice(&0u32.to_be_bytes());
        self
    }

    pub fn bookend(mut self, frame: i32) -> Self {
        self.bytes.push(FRAME_BOOKEND);
        self.bytes.extend_from_slice(&frame.to_be_bytes());
        self.bytes.extend_from_slice(&frame.to_be_bytes());
        self
    }

    pub fn game_end(mut self) -> Self {
        self.bytes.extend_from_slice(&[GAME_END, 0x02]);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// A complete modern frame: one post-frame per body, then a bookend.
    pub fn frame(self, frame: i32, bodies: &[PostFrame]) -> Self {
        let mut builder = self.frame_start(frame);
        for body in bodies {
            builder = builder.post(PostFrame { frame, ..*body });
        }
        builder.bookend(frame)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// UBJSON length prefix using the `l` marker.
fn length(out: &mut Vec<u8>, len: usize) {
    out.push(b'l');
    out.extend_from_slice(&(len as i32).to_be_bytes());
}

fn key(out: &mut Vec<u8>, name: &str) {
    length(out, name.len());
    out.extend_from_slice(name.as_bytes());
}

fn string(out: &mut Vec<u8>, value: &str) {
    out.push(b'S');
    length(out, value.len());
    out.extend_from_slice(value.as_bytes());
}

/// A replay envelope around `raw`, with typical metadata.
///
/// `players` lists `(wire slot, netplay name, connect code)`.
pub fn replay_document(raw: &[u8], console_nick: &str, players: &[(u8, &str, &str)]) -> Vec<u8> {
    let mut out = vec![b'{'];
    key(&mut out, "raw");
    out.extend_from_slice(b"[$U#");
    length(&mut out, raw.len());
    out.extend_from_slice(raw);

    key(&mut out, "metadata");
    out.push(b'{');
    key(&mut out, "startAt");
    string(&mut out, "2020-01-01T00:00:00Z");
    key(&mut out, "lastFrame");
    out.push(b'l');
    out.extend_from_slice(&100i32.to_be_bytes());
    key(&mut out, "players");
    out.push(b'{');
    for (slot, name, code) in players {
        key(&mut out, &slot.to_string());
        out.push(b'{');
        key(&mut out, "names");
        out.push(b'{');
        key(&mut out, "netplay");
        string(&mut out, name);
        key(&mut out, "code");
        string(&mut out, code);
        out.push(b'}');
        out.push(b'}');
    }
    out.push(b'}');
    key(&mut out, "playedOn");
    string(&mut out, "dolphin");
    key(&mut out, "consoleNick");
    string(&mut out, console_nick);
    out.push(b'}');
    out.push(b'}');
    out
}
