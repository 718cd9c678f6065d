use tracing::info;

/// Seam for the one-time code step that precedes registration. Delivery is
/// out of scope; the production implementation is a static stub.
pub trait SmsGateway: Send + Sync {
    fn send_code(&self, phone: &str) -> String;
    fn verify_code(&self, phone: &str, code: &str) -> bool;
}

/// Accepts the fixed code `1111` for any phone and "delivers" it as a log
/// line. Kept as the production gateway until a real SMS provider is wired
/// in.
pub struct StaticCodeGateway;

const STATIC_CODE: &str = "1111";

impl SmsGateway for StaticCodeGateway {
    fn send_code(&self, phone: &str) -> String {
        info!(phone = %phone, code = STATIC_CODE, "sms code issued");
        STATIC_CODE.to_string()
    }

    fn verify_code(&self, _phone: &str, code: &str) -> bool {
        code == STATIC_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_code_accepted_for_any_phone() {
        let gw = StaticCodeGateway;
        assert!(gw.verify_code("+7 (999) 123-45-67", "1111"));
        assert!(gw.verify_code("whatever", "1111"));
    }

    #[test]
    fn other_codes_rejected() {
        let gw = StaticCodeGateway;
        assert!(!gw.verify_code("+7 (999) 123-45-67", "0000"));
        assert!(!gw.verify_code("+7 (999) 123-45-67", ""));
    }

    #[test]
    fn send_returns_the_code_it_will_accept() {
        let gw = StaticCodeGateway;
        let code = gw.send_code("+7 (999) 123-45-67");
        assert!(gw.verify_code("+7 (999) 123-45-67", &code));
    }
}
