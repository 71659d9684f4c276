use std::env;

// Vector lengths (in bits) a scalable vector unit may implement and that this
// crate can be configured for.
const SUPPORTED_BITS: [usize; 5] = [128, 256, 512, 1024, 2048];

// Used when nothing overrides or detects a length.
const DEFAULT_BITS: usize = 512;

// Where a vector length came from, in decreasing priority.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum Source {
    Environment,
    Detected,
    Default,
}

#[derive(PartialEq, Eq, Debug)]
struct VectorLength {
    bits: usize,
    source: Source,
}

impl VectorLength {
    fn new(bits: usize, source: Source) -> Option<Self> {
        SUPPORTED_BITS
            .contains(&bits)
            .then_some(VectorLength { bits, source })
    }

    fn cfg_value(&self) -> String {
        self.bits.to_string()
    }
}

// Vector length detection trait to keep per-platform probing modular
trait VectorLengthDetector {
    fn detect(&self) -> Option<VectorLength>;
    fn is_applicable(&self) -> bool;
}

// Explicit override, honoured for native and cross builds alike
struct EnvironmentDetector;
impl VectorLengthDetector for EnvironmentDetector {
    fn detect(&self) -> Option<VectorLength> {
        let raw = env::var("SVMATH_VECTOR_BITS").ok()?;
        let length = raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|bits| VectorLength::new(bits, Source::Environment));
        if length.is_none() {
            println!(
                "cargo:warning=ignoring SVMATH_VECTOR_BITS={raw}: expected one of {SUPPORTED_BITS:?}"
            );
        }
        length
    }

    fn is_applicable(&self) -> bool {
        true
    }
}

// Linux exposes the default SVE vector length (in bytes) for new processes
struct LinuxDetector;
impl VectorLengthDetector for LinuxDetector {
    fn detect(&self) -> Option<VectorLength> {
        let contents = std::fs::read_to_string("/proc/sys/abi/sve_default_vector_length").ok()?;
        let bytes = contents.trim().parse::<usize>().ok()?;
        VectorLength::new(bytes * 8, Source::Detected)
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux") && env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("aarch64")
    }
}

// No macOS detector: Apple silicon has no SVE unit, the default applies.

struct PlatformDetector;
impl PlatformDetector {
    fn vector_length_detectors() -> Vec<Box<dyn VectorLengthDetector>> {
        vec![Box::new(LinuxDetector)]
    }

    fn detect_vector_length(is_native_build: bool) -> VectorLength {
        if let Some(length) = EnvironmentDetector.detect() {
            return length;
        }

        // Probing the host only makes sense when the host is the target
        if is_native_build {
            for detector in Self::vector_length_detectors() {
                if !detector.is_applicable() {
                    continue;
                }
                if let Some(length) = detector.detect() {
                    return length;
                }
            }
        }

        VectorLength {
            bits: DEFAULT_BITS,
            source: Source::Default,
        }
    }

    fn apply(length: &VectorLength) {
        println!("applying: {} bit vectors ({:?})", length.bits, length.source);

        println!("cargo:rustc-cfg=sv_bits=\"{}\"", length.cfg_value());

        let values = SUPPORTED_BITS
            .iter()
            .map(|bits| format!("\"{bits}\""))
            .collect::<Vec<_>>()
            .join(", ");
        println!("cargo::rustc-check-cfg=cfg(sv_bits, values({values}))");
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=SVMATH_VECTOR_BITS");
    println!("cargo:rerun-if-changed=build.rs");

    // Determine if we're cross-compiling
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    let is_native_build = host == target;

    let length = PlatformDetector::detect_vector_length(is_native_build);

    PlatformDetector::apply(&length);
}
