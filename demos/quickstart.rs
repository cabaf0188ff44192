//! # Quickstart Example
//!
//! Minimal tour of cybergear-slcan:
//! - Render the command lines that put a motor in speed mode
//! - Decode the feedback line a motor answers with
//! - Read a parameter reply
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use cybergear_slcan::protocol::messages::{
    decode_response, encode_enable, encode_read_parameter, encode_set_run_mode,
    encode_set_speed_reference, encode_disable, ParameterIndex, Response, RunMode,
};
use cybergear_slcan::protocol::transport::slcan::{Bitrate, SlcanCommand};

const HOST_ID: u8 = 0x00;
const MOTOR_ID: u8 = 0x7F;

fn main() {
    println!("=== cybergear-slcan Quickstart ===\n");

    // ======================================================================
    // 1. Adapter setup and speed-mode command sequence
    // ======================================================================
    println!("1. Lines to send (each followed by \\r)");

    println!("   bitrate : {}", SlcanCommand::SetBitrate(Bitrate::Mbit1).encode().as_str());
    println!("   open    : {}", SlcanCommand::Open.encode().as_str());

    let steps = [
        ("run mode", encode_set_run_mode(HOST_ID, MOTOR_ID, RunMode::Speed)),
        ("enable", encode_enable(HOST_ID, MOTOR_ID)),
        ("speed", encode_set_speed_reference(HOST_ID, MOTOR_ID, 1.12)),
        ("read vbus", encode_read_parameter(HOST_ID, MOTOR_ID, ParameterIndex::VBUS)),
        ("disable", encode_disable(HOST_ID, MOTOR_ID)),
    ];
    for (label, line) in steps {
        match line {
            Ok(line) => println!("   {:<8}: {}", label, line.as_str()),
            Err(e) => eprintln!("   {:<8}: encode error: {}", label, e),
        }
    }

    match encode_set_speed_reference(HOST_ID, MOTOR_ID, 45.0) {
        Ok(line) => println!("   unexpected: {}", line.as_str()),
        Err(e) => println!("   45 rad/s refused: {}\n", e),
    }

    // ======================================================================
    // 2. Decode what the motor sends back
    // ======================================================================
    println!("2. Decoding replies");

    let replies: [&[u8]; 3] = [
        b"T02807F00880008000800000C8\r",
        b"T11007F0081C7000000000C041\r",
        b"T02807F0088000800080\r",
    ];
    for reply in replies {
        match decode_response(reply) {
            Ok(Response::MotorFeedback(feedback)) => println!("   {}", feedback),
            Ok(Response::Parameter(parameter)) => {
                println!("   {} -> {:?}", parameter, parameter.value())
            }
            Err(e) => println!("   rejected: {}", e),
        }
    }
}
