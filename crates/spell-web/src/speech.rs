use spell_engine::{GameConfig, SpeechRequest};
use web_sys::SpeechSynthesisUtterance;

/// Read text aloud with the browser's speech synthesis.
/// Anything still speaking is cut off first. Silently does nothing when the
/// browser has no synthesis support.
pub fn speak(request: &SpeechRequest, config: &GameConfig) {
    let Some(synth) = web_sys::window().and_then(|w| w.speech_synthesis().ok()) else {
        log::debug!("Speech synthesis unavailable, skipping {:?}", request.text);
        return;
    };
    synth.cancel();

    match SpeechSynthesisUtterance::new_with_text(&request.text) {
        Ok(utterance) => {
            utterance.set_rate(config.speech_rate);
            utterance.set_pitch(config.speech_pitch);
            utterance.set_volume(config.speech_volume);
            synth.speak(&utterance);
        }
        Err(e) => log::warn!("Could not create utterance: {:?}", e),
    }
}
