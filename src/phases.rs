use crate::runner::CommandSpec;
use crate::session::Session;

/// Common-port list handed to nmap; kept deliberately short so the slow
/// timing template finishes within the command timeout.
const NMAP_PORTS: &str = "21,22,23,25,53,80,110,135,139,143,443,993,995,1433,3306,3389,5432,8080,8443";

/// Nuclei template categories restricted to passive/low-noise checks.
const NUCLEI_TEMPLATES: [&str; 3] = [
    "http/technologies/",
    "http/exposures/",
    "http/misconfiguration/",
];

/// One category of external scan. Each phase is a pure mapping from a
/// target to the command invocation(s) that implement it; no phase reads
/// tool output or branches on what an earlier phase produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WafDetection,
    PortScan,
    WebTech,
    Nuclei,
    Probe,
}

impl Phase {
    /// Fixed per-target ordering, never reordered or parallelized.
    pub const SEQUENCE: [Phase; 5] = [
        Phase::WafDetection,
        Phase::PortScan,
        Phase::WebTech,
        Phase::Nuclei,
        Phase::Probe,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::WafDetection => "WAF detection",
            Phase::PortScan => "stealth port scan",
            Phase::WebTech => "web technology fingerprint",
            Phase::Nuclei => "vulnerability templates",
            Phase::Probe => "TLS and header probe",
        }
    }

    /// Session subdirectory this phase writes into.
    pub fn category(&self) -> &'static str {
        match self {
            Phase::WafDetection => "waf_detection",
            Phase::PortScan => "nmap",
            Phase::WebTech => "web_tech",
            Phase::Nuclei => "nuclei",
            Phase::Probe => "logs",
        }
    }

    /// Builds the invocation(s) for one target. Every phase but the ad-hoc
    /// probe maps to exactly one command.
    pub fn commands(&self, target: &str, session: &Session) -> Vec<CommandSpec> {
        match self {
            Phase::WafDetection => {
                let out = session.output_path(self.category(), "waf", target, "txt");
                vec![
                    CommandSpec::new("wafw00f", vec!["-v".into(), format!("https://{target}")])
                        .with_output(out),
                ]
            }
            Phase::PortScan => {
                let out = session.output_path(self.category(), "nmap", target, "txt");
                // SYN scan on the slowest timing template, fragmented, from
                // source port 53 so probes resemble DNS traffic.
                let args: Vec<String> = [
                    "-sS",
                    "-T1",
                    "--scan-delay",
                    "10s",
                    "--max-retries",
                    "2",
                    "--max-scan-delay",
                    "10s",
                    "-f",
                    "--source-port",
                    "53",
                    "--data-length",
                    "25",
                    "-Pn",
                    "-sV",
                    "--version-intensity",
                    "2",
                    "--script=default,safe",
                    "-p",
                    NMAP_PORTS,
                    "-oN",
                ]
                .iter()
                .map(|s| s.to_string())
                .chain([out.display().to_string(), target.to_string()])
                .collect();
                vec![CommandSpec::new("nmap", args)]
            }
            Phase::WebTech => {
                let out = session.output_path(self.category(), "whatweb", target, "json");
                let args: Vec<String> = [
                    "--aggression",
                    "1",
                    "--wait",
                    "10",
                    "--read-timeout",
                    "30",
                    "--max-threads",
                    "1",
                    "--log-json",
                ]
                .iter()
                .map(|s| s.to_string())
                .chain([out.display().to_string(), format!("https://{target}")])
                .collect();
                vec![CommandSpec::new("whatweb", args)]
            }
            Phase::Nuclei => {
                let out = session.output_path(self.category(), "nuclei", target, "json");
                let mut args: Vec<String> = vec!["-u".into(), format!("https://{target}")];
                for template in NUCLEI_TEMPLATES {
                    args.push("-t".into());
                    args.push(template.into());
                }
                args.extend(
                    [
                        "-severity",
                        "info,low",
                        "-rate-limit",
                        "10",
                        "-timeout",
                        "30",
                        "-retries",
                        "1",
                        "-j",
                        "-o",
                    ]
                    .iter()
                    .map(|s| s.to_string()),
                );
                args.push(out.display().to_string());
                vec![CommandSpec::new("nuclei", args)]
            }
            Phase::Probe => {
                let ssl_out = session.output_path(self.category(), "ssl", target, "txt");
                let headers_out = session.output_path(self.category(), "headers", target, "txt");
                vec![
                    CommandSpec::new(
                        "openssl",
                        vec![
                            "s_client".into(),
                            "-connect".into(),
                            format!("{target}:443"),
                            "-servername".into(),
                            target.to_string(),
                        ],
                    )
                    .with_output(ssl_out),
                    CommandSpec::new(
                        "curl",
                        vec![
                            "-I".into(),
                            "-s".into(),
                            "--connect-timeout".into(),
                            "30".into(),
                            "--max-time".into(),
                            "60".into(),
                            format!("https://{target}"),
                        ],
                    )
                    .with_output(headers_out),
                ]
            }
        }
    }
}
