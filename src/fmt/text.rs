use console::style;

use crate::domain::ntp::NtpPacket;
use crate::stats::ServeStats;

/// Printable form of a reference id: ASCII codes as text, anything else as
/// a dotted quad.
pub fn render_reference_id(id: u32) -> String {
    let bytes = id.to_be_bytes();
    let code: Vec<u8> = bytes.iter().copied().take_while(|&b| b != 0).collect();
    let trailing_nuls = bytes[code.len()..].iter().all(|&b| b == 0);
    let printable = code
        .iter()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if !code.is_empty() && trailing_nuls && printable {
        String::from_utf8_lossy(&code).into_owned()
    } else {
        format!("{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// One-line packet summary for debug logs.
pub fn render_packet(p: &NtpPacket) -> String {
    format!(
        "li={} vn={} mode={} stratum={} poll={} precision={} delay={:#010x} disp={:#010x} refid={} ref={} org={} rec={} xmt={}",
        p.leap_indicator.bits(),
        p.version,
        p.mode,
        p.stratum,
        p.poll,
        p.precision,
        p.root_delay,
        p.root_dispersion,
        render_reference_id(p.reference_id),
        p.reference_timestamp,
        p.origin_timestamp,
        p.receive_timestamp,
        p.transmit_timestamp,
    )
}

/// Shutdown summary of the serving counters.
pub fn render_stats(s: &ServeStats) -> String {
    format!(
        "{rcv_lbl} {rcv}\n\
         {rsp_lbl} {rsp}\n\
         {drp_lbl} {drp} (malformed: {mal}, unsupported mode: {uns}, send errors: {snd})\n\
         {err_lbl} {rer}",
        rcv_lbl = style("Received:").cyan().bold(),
        rcv = s.received,
        rsp_lbl = style("Responded:").cyan().bold(),
        rsp = style(s.responded).green(),
        drp_lbl = style("Dropped:").cyan().bold(),
        drp = s.dropped(),
        mal = s.malformed,
        uns = s.unsupported_mode,
        snd = s.send_errors,
        err_lbl = style("Receive errors:").cyan().bold(),
        rer = s.receive_errors,
    )
}
