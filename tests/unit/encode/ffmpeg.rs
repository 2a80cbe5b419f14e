use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
        bg_rgba: [0, 0, 0, 255],
    }
}

fn out_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("cacheflow-ffmpeg-{}", std::process::id()))
        .join(name)
}

#[test]
fn begin_rejects_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path("odd.mp4")));
    let err = sink.begin(cfg(31, 20)).unwrap_err();
    assert!(err.to_string().contains("even"));
    assert!(!sink.is_encoding());
}

#[test]
fn encoder_reads_rawvideo_at_the_sink_rate() {
    let mut c = cfg(64, 36);
    c.fps = Fps { num: 30000, den: 1001 };
    let args = encoder_args(&c, Path::new("out/a.mp4"), false);
    assert_eq!(args[0], "-n");
    let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[pos("-s") + 1], "64x36");
    assert_eq!(args[pos("-r") + 1], "30000/1001");
    assert!(pos("-r") < pos("-i"), "rate must apply to the input stream");
    assert_eq!(args.last().map(String::as_str), Some("out/a.mp4"));
}

#[test]
fn begin_rejects_zero_fps() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path("zero.mp4")));
    let mut c = cfg(32, 20);
    c.fps = Fps { num: 0, den: 1 };
    assert!(sink.begin(c).is_err());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path("early.mp4")));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn encodes_mp4_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let path = out_path("ok.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&path));
    sink.begin(cfg(16, 16)).unwrap();
    for i in 0..3 {
        let frame = FrameRGBA {
            width: 16,
            height: 16,
            data: vec![128; 16 * 16 * 4],
            premultiplied: true,
        };
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
