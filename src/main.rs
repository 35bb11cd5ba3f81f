use clap::Parser;
use dialoguer::{Confirm, Input};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use subfetch::{ProgressEvent, SavedSubtitle, SubFetchError, fetch_subtitles};

/// A no hassle subtitle downloader for SubDB
#[derive(Parser)]
#[command(name = "subfetch", version, about)]
struct Cli {
    /// Path to the video file to download subtitles for. Without it,
    /// subfetch asks interactively.
    path: Option<PathBuf>,
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { path } => {
            println!("Processing {}...", path.display());
        }
        ProgressEvent::FingerprintComputed { fingerprint } => {
            println!("FILM HASH: {fingerprint}");
        }
        ProgressEvent::SearchingSubtitles => {
            println!("Fetching subtitles...");
        }
        ProgressEvent::LanguagesFound { languages } => {
            println!("AVAILABLE SUBTITLES: {}", languages.join(","));
        }
        ProgressEvent::NoSubtitlesFound => {
            println!("No subtitles found :(");
        }
        ProgressEvent::DownloadingLanguage {
            index,
            total,
            language,
        } => {
            println!(
                "[{}/{}] Downloading '{}' subtitle...",
                index + 1,
                total,
                language
            );
        }
        ProgressEvent::SubtitleSaved { path, .. } => {
            println!("SUBTITLE PATH: {}", path.display());
        }
        ProgressEvent::DownloadFailed { language, reason } => {
            eprintln!("Could not download '{language}' subtitle: {reason}");
        }
        ProgressEvent::Completed { saved, failed } => {
            if failed == 0 {
                println!("\nDownload completed! Saved {saved} subtitle(s).");
            } else {
                println!(
                    "\nDownload completed with {failed} failure(s). Saved {saved} subtitle(s)."
                );
            }
        }
    }
}

/// Prints a hint when the file content does not look like a video.
///
/// SubDB indexes films by content hash, so fingerprinting arbitrary files
/// works but will not match anything. The check is advisory only.
fn warn_if_not_video(path: &Path) {
    const SNIFF_SIZE: usize = 8192;

    let Ok(mut file) = File::open(path) else {
        return;
    };

    let mut buffer = vec![0u8; SNIFF_SIZE];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return;
    };
    buffer.truncate(bytes_read);

    if !infer::is_video(&buffer) {
        println!("Note: this doesn't look like a video file, the service will likely not know it.");
    }
}

/// Processes one video file, printing progress along the way
fn process_file(path: &Path) -> Result<Vec<SavedSubtitle>, SubFetchError> {
    warn_if_not_video(path);
    let result = fetch_subtitles(path, handle_progress_event);
    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }
    println!();
    result
}

/// Asks for video file paths until the user declines to continue
fn interactive_loop() {
    loop {
        let input: String = match Input::new()
            .with_prompt("Type the movie's file path")
            .interact_text()
        {
            Ok(input) => input,
            // Prompt aborted (EOF or no terminal); nothing more to ask.
            Err(_) => return,
        };

        let path = Path::new(input.trim());
        if path.is_file() {
            let _ = process_file(path);
        } else {
            eprintln!("That doesn't appear to be a file path, skipping...\n");
        }

        let another = Confirm::new()
            .with_prompt("Download another subtitle?")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !another {
            println!("Sure! Let's call it a day...");
            return;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    println!("subfetch - A no hassle subtitle downloader for SubDB\n");

    if let Some(path) = cli.path {
        if path.is_file() {
            if process_file(&path).is_err() {
                process::exit(1);
            }
            return;
        }
        eprintln!("The received argument doesn't appear to be a file path, skipping...\n");
    }

    interactive_loop();
}
