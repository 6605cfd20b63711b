//! User-facing strings in the two supported locales.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "ko" | "ko-kr" | "ko_kr" => Ok(Locale::Ko),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

/// Message keys shown in the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Text {
    AuthEmailInUse,
    AuthInvalidEmail,
    AuthWeakPassword,
    AuthCredentialMismatch,
    AuthFederatedFailed,
    AuthGeneric,
    LoginRequired,
    EmptySubmission,
    SaveFailed,
    PayloadTooLarge,
    DeleteFailed,
    ImageTooLarge,
    UnsupportedImage,
    FeedEmpty,
    AccessRulesTitle,
    AccessRulesBody,
    SignInHeading,
    SignUpHeading,
    SignInSubmit,
    SignUpSubmit,
    Processing,
    SwitchToSignUp,
    SwitchToSignIn,
    FederatedButton,
    SignOut,
    WorkspaceHeading,
    FeedHeading,
    TitlePlaceholder,
    ContentPlaceholder,
    Publish,
    JustNow,
    ReloadAfterRules,
    ToolBold,
    ToolItalic,
    ToolUnderline,
    ToolStrikethrough,
    ToolBulletList,
    ToolNumberedList,
    ToolHeading,
    InsertImage,
    AddText,
    Backspace,
    MoveCaret,
    SelectRange,
    Saving,
}

impl Text {
    pub fn in_locale(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en(),
            Locale::Ko => self.ko(),
        }
    }

    /// True when `candidate` is this text in any supported locale
    pub fn matches_any_locale(self, candidate: &str) -> bool {
        [Locale::En, Locale::Ko]
            .into_iter()
            .any(|locale| self.in_locale(locale) == candidate)
    }

    fn en(self) -> &'static str {
        match self {
            Text::AuthEmailInUse => "This email address is already in use.",
            Text::AuthInvalidEmail => "The email address is not valid.",
            Text::AuthWeakPassword => "The password is too weak (at least 6 characters).",
            Text::AuthCredentialMismatch => "Email or password does not match.",
            Text::AuthFederatedFailed => "Federated sign-in failed.",
            Text::AuthGeneric => "Something went wrong while signing in. Please try again.",
            Text::LoginRequired => "You need to sign in first.",
            Text::EmptySubmission => "Enter a title and some content before posting.",
            Text::SaveFailed => "Saving the post failed.",
            Text::PayloadTooLarge => "The post is too large. Try smaller images.",
            Text::DeleteFailed => "You are not allowed to delete this post, or deleting failed.",
            Text::ImageTooLarge => "This image is large. Smaller images are recommended.",
            Text::UnsupportedImage => "Only image files can be inserted.",
            Text::FeedEmpty => "Nothing here yet.",
            Text::AccessRulesTitle => "Store access rules need to be updated",
            Text::AccessRulesBody => {
                "The post store refused access. Update its access rules, then reload."
            }
            Text::SignInHeading => "Welcome Back",
            Text::SignUpHeading => "Create Account",
            Text::SignInSubmit => "Sign In",
            Text::SignUpSubmit => "Sign Up",
            Text::Processing => "Processing...",
            Text::SwitchToSignUp => "Don't have an account? Sign up",
            Text::SwitchToSignIn => "Already have an account? Sign in",
            Text::FederatedButton => "Continue with",
            Text::SignOut => "Sign out",
            Text::WorkspaceHeading => "Workspace",
            Text::FeedHeading => "Feed",
            Text::TitlePlaceholder => "Enter a title",
            Text::ContentPlaceholder => "Tell your story with formatting and images...",
            Text::Publish => "Publish",
            Text::JustNow => "Just now",
            Text::ReloadAfterRules => "Reload after updating the rules",
            Text::ToolBold => "Bold",
            Text::ToolItalic => "Italic",
            Text::ToolUnderline => "Underline",
            Text::ToolStrikethrough => "Strikethrough",
            Text::ToolBulletList => "Bulleted list",
            Text::ToolNumberedList => "Numbered list",
            Text::ToolHeading => "Heading",
            Text::InsertImage => "Insert image",
            Text::AddText => "Add text",
            Text::Backspace => "Delete before caret",
            Text::MoveCaret => "Move caret",
            Text::SelectRange => "Select",
            Text::Saving => "Saving...",
        }
    }

    fn ko(self) -> &'static str {
        match self {
            Text::AuthEmailInUse => "이미 사용 중인 이메일입니다.",
            Text::AuthInvalidEmail => "유효하지 않은 이메일 형식입니다.",
            Text::AuthWeakPassword => "비밀번호가 너무 취약합니다 (6자 이상).",
            Text::AuthCredentialMismatch => "이메일 또는 비밀번호가 일치하지 않습니다.",
            Text::AuthFederatedFailed => "소셜 로그인 중 오류가 발생했습니다.",
            Text::AuthGeneric => "인증 중 오류가 발생했습니다. 다시 시도해주세요.",
            Text::LoginRequired => "로그인이 필요합니다.",
            Text::EmptySubmission => "제목과 내용을 입력해주세요.",
            Text::SaveFailed => "저장에 실패했습니다.",
            Text::PayloadTooLarge => "게시물 용량이 너무 큽니다. 이미지 크기를 줄여주세요.",
            Text::DeleteFailed => "삭제 권한이 없거나 오류가 발생했습니다.",
            Text::ImageTooLarge => "이미지 용량이 큽니다. 더 작은 이미지를 권장합니다.",
            Text::UnsupportedImage => "이미지 파일만 삽입할 수 있습니다.",
            Text::FeedEmpty => "아직 소식이 없습니다.",
            Text::AccessRulesTitle => "저장소 접근 규칙 설정이 필요합니다",
            Text::AccessRulesBody => "저장소가 접근을 거부했습니다. 접근 규칙을 수정한 뒤 새로고침하세요.",
            Text::SignInHeading => "다시 오신 것을 환영합니다",
            Text::SignUpHeading => "계정 만들기",
            Text::SignInSubmit => "로그인",
            Text::SignUpSubmit => "회원가입",
            Text::Processing => "처리 중...",
            Text::SwitchToSignUp => "계정이 없으신가요? 회원가입",
            Text::SwitchToSignIn => "이미 계정이 있으신가요? 로그인",
            Text::FederatedButton => "다음으로 계속하기:",
            Text::SignOut => "로그아웃",
            Text::WorkspaceHeading => "워크스페이스",
            Text::FeedHeading => "피드",
            Text::TitlePlaceholder => "제목을 입력하세요",
            Text::ContentPlaceholder => "서식과 이미지를 활용해 이야기를 들려주세요...",
            Text::Publish => "게시물 올리기",
            Text::JustNow => "방금 전",
            Text::ReloadAfterRules => "규칙 적용 후 새로고침",
            Text::ToolBold => "굵게",
            Text::ToolItalic => "기울임",
            Text::ToolUnderline => "밑줄",
            Text::ToolStrikethrough => "취소선",
            Text::ToolBulletList => "글머리 기호 목록",
            Text::ToolNumberedList => "번호 매기기 목록",
            Text::ToolHeading => "제목 서식",
            Text::InsertImage => "이미지 삽입",
            Text::AddText => "텍스트 추가",
            Text::Backspace => "커서 앞 글자 삭제",
            Text::MoveCaret => "커서 이동",
            Text::SelectRange => "범위 선택",
            Text::Saving => "저장 중...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("ko".parse::<Locale>(), Ok(Locale::Ko));
        assert_eq!("EN-US".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_matches_any_locale() {
        assert!(Text::ContentPlaceholder.matches_any_locale(Text::ContentPlaceholder.en()));
        assert!(Text::ContentPlaceholder.matches_any_locale(Text::ContentPlaceholder.ko()));
        assert!(!Text::ContentPlaceholder.matches_any_locale("Hello"));
    }

    #[test]
    fn test_every_text_is_translated() {
        let all = [
            Text::AuthEmailInUse,
            Text::AuthInvalidEmail,
            Text::AuthWeakPassword,
            Text::AuthCredentialMismatch,
            Text::AuthFederatedFailed,
            Text::AuthGeneric,
            Text::LoginRequired,
            Text::EmptySubmission,
            Text::SaveFailed,
            Text::PayloadTooLarge,
            Text::DeleteFailed,
            Text::ImageTooLarge,
            Text::UnsupportedImage,
            Text::FeedEmpty,
            Text::AccessRulesTitle,
            Text::AccessRulesBody,
            Text::SignInHeading,
            Text::SignUpHeading,
            Text::SignInSubmit,
            Text::SignUpSubmit,
            Text::Processing,
            Text::SwitchToSignUp,
            Text::SwitchToSignIn,
            Text::FederatedButton,
            Text::SignOut,
            Text::WorkspaceHeading,
            Text::FeedHeading,
            Text::TitlePlaceholder,
            Text::ContentPlaceholder,
            Text::Publish,
            Text::JustNow,
            Text::ReloadAfterRules,
            Text::ToolBold,
            Text::ToolItalic,
            Text::ToolUnderline,
            Text::ToolStrikethrough,
            Text::ToolBulletList,
            Text::ToolNumberedList,
            Text::ToolHeading,
            Text::InsertImage,
            Text::AddText,
            Text::Backspace,
            Text::MoveCaret,
            Text::SelectRange,
            Text::Saving,
        ];
        for text in all {
            assert!(!text.in_locale(Locale::En).is_empty());
            assert!(!text.in_locale(Locale::Ko).is_empty());
            assert_ne!(text.in_locale(Locale::En), text.in_locale(Locale::Ko));
        }
    }
}
