use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Text-to-speech backend. Speaking is fire and forget: callers never wait
/// for playback to finish.
pub trait Speaker {
    /// Stop anything currently playing, then start speaking `word`
    fn speak(&mut self, word: &str, voice: &str);
    fn cancel(&mut self);
}

/// Speaker that produces no audio
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, _word: &str, _voice: &str) {}
    fn cancel(&mut self) {}
}

/// Speech programs we know how to drive, in order of preference
const PROGRAMS: [&str; 4] = ["espeak-ng", "espeak", "spd-say", "say"];

/// Speaker backed by an external speech program found on PATH
#[derive(Debug)]
pub struct CommandSpeaker {
    program: Option<PathBuf>,
    child: Option<Child>,
}

impl CommandSpeaker {
    pub fn detect() -> Self {
        let program = PROGRAMS.iter().find_map(|name| which::which(name).ok());
        match &program {
            Some(path) => log::info!("voice-over uses {}", path.display()),
            None => log::warn!("no speech program found on PATH, voice-over is silent"),
        }
        Self {
            program,
            child: None,
        }
    }

    pub fn with_program(program: Option<PathBuf>) -> Self {
        Self {
            program,
            child: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn command(program: &Path, word: &str, voice: &str) -> Command {
        let name = program
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut cmd = Command::new(program);
        cmd.args(speech_args(&name, word, voice));
        cmd
    }
}

/// Arguments for `program` speaking `word` at 0.8x the program's default rate
pub fn speech_args(program: &str, word: &str, voice: &str) -> Vec<String> {
    let mut args: Vec<String> = match program {
        "espeak-ng" | "espeak" => vec!["-v".into(), voice.into(), "-s".into(), "140".into()],
        "spd-say" => {
            let lang = voice.split('-').next().unwrap_or(voice);
            vec!["-l".into(), lang.into(), "-r".into(), "-20".into()]
        }
        "say" => vec!["-r".into(), "140".into()],
        _ => vec![],
    };
    args.push(word.to_string());
    args
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, word: &str, voice: &str) {
        self.cancel();
        if word.is_empty() {
            return;
        }
        let Some(program) = &self.program else {
            return;
        };

        match Self::command(program, word, voice)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.child = Some(child),
            Err(e) => {
                log::warn!("failed to spawn {}: {}", program.display(), e);
                // don't retry a program that can't start
                self.program = None;
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Voice-over switch in front of a speaker
pub struct VoiceOver {
    enabled: bool,
    speaker: Box<dyn Speaker>,
}

impl VoiceOver {
    pub fn new(enabled: bool, speaker: Box<dyn Speaker>) -> Self {
        Self { enabled, speaker }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip voice-over. Disabling cancels playback; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.speaker.cancel();
        }
        self.enabled
    }

    /// Speak `word` if voice-over is on
    pub fn announce(&mut self, word: &str, voice: &str) {
        if self.enabled {
            self.speaker.speak(word, voice);
        }
    }
}

impl std::fmt::Debug for VoiceOver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceOver")
            .field("enabled", &self.enabled)
            .finish()
    }
}
