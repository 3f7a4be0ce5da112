use std::path::Path;
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};

fn nain(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nain"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .env_remove("SMTP_HOST")
        .output()
        .expect("failed to spawn nain")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn init_scaffolds_config_and_pages() {
    let dir = tempfile::tempdir().unwrap();
    let output = nain(dir.path(), &["init", "site"]);
    assert!(output.status.success(), "{:?}", output);

    let site = dir.path().join("site");
    assert!(site.join("nain.config.toml").is_file());
    for page in ["public/index.html", "public/work/index.html", "public/contact/index.html"] {
        assert!(site.join(page).is_file(), "{page}");
    }
    assert!(site.join("public/sequence/02").is_dir());

    let again = nain(dir.path(), &["init", "site"]);
    assert!(!again.status.success());
}

#[test]
fn info_reports_sequence_and_mail_state() {
    let dir = tempfile::tempdir().unwrap();
    let output = nain(dir.path(), &["info"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("51 frames"));
    assert!(text.contains("/sequence/02/frame_0000.png .. /sequence/02/frame_0050.png"));
    assert!(text.contains("not configured"));
}

#[test]
fn check_fails_until_every_frame_exists() {
    let dir = tempfile::tempdir().unwrap();
    assert!(nain(dir.path(), &["init", "site"]).status.success());
    let site = dir.path().join("site");

    std::fs::write(
        site.join("nain.config.toml"),
        "[sequence]\nbase_path = \"/seq/f_\"\ncount = 3\npad = 4\next = \"png\"\n\
         entry_offset = \"start end\"\nexit_offset = \"end start\"\nbackground = \"#000000\"\n",
    )
    .unwrap();
    std::fs::create_dir_all(site.join("public/seq")).unwrap();
    for index in 0..2 {
        RgbaImage::from_pixel(16, 9, Rgba([10, 20, 30, 255]))
            .save(site.join(format!("public/seq/f_{:04}.png", index)))
            .unwrap();
    }

    let failed = nain(&site, &["check"]);
    assert!(!failed.status.success());
    assert!(stdout(&failed).contains("frame 2"));

    RgbaImage::from_pixel(16, 9, Rgba([10, 20, 30, 255]))
        .save(site.join("public/seq/f_0002.png"))
        .unwrap();
    let ok = nain(&site, &["check"]);
    assert!(ok.status.success(), "{:?}", ok);
    assert!(stdout(&ok).contains("3 / 3 frames OK"));

    let preview = nain(
        &site,
        &["preview", "--progress", "1", "--width", "160", "--height", "90", "-o", "out/p.png"],
    );
    assert!(preview.status.success(), "{:?}", preview);
    let png = image::open(site.join("out/p.png")).unwrap();
    assert_eq!((png.width(), png.height()), (160, 90));
}

#[test]
fn bad_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("nain.config.toml"), "[sequence]\ncount = \"many\"\n").unwrap();
    let output = nain(dir.path(), &["info"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
}
