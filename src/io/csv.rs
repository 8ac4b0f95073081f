use std::io::{self, Write};
use std::path::Path;

use crate::sim::TickRecord;

/// Write per-tick telemetry in CSV format.
///
/// Columns: time, episode, step, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          omega_x, omega_y, omega_z, up_z, pitch, roll, yaw, throttle,
///          distance, reward, cumulative_reward, outcome
pub fn write_ticks<W: Write>(writer: &mut W, ticks: &[TickRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "time,episode,step,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         omega_x,omega_y,omega_z,up_z,pitch,roll,yaw,throttle,\
         distance,reward,cumulative_reward,outcome"
    )?;

    for t in ticks {
        let outcome = match (t.termination, t.truncated) {
            (Some(term), _) => term.label(),
            (None, true) => "truncated",
            (None, false) => "",
        };
        writeln!(
            writer,
            "{:.4},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.6},{:.3},{:.3},{:.3},{:.3},\
             {:.4},{:.6},{:.6},{}",
            t.time,
            t.episode,
            t.step,
            t.pos.x, t.pos.y, t.pos.z,
            t.vel.x, t.vel.y, t.vel.z,
            t.omega.x, t.omega.y, t.omega.z,
            t.up_z,
            t.action.pitch(), t.action.roll(), t.action.yaw(), t.action.throttle(),
            t.distance,
            t.reward,
            t.cumulative_reward,
            outcome,
        )?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_ticks_file(path: impl AsRef<Path>, ticks: &[TickRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_ticks(&mut file, ticks)
}
