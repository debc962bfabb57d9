//! Localized strings the core renders itself: notices, result labels, the
//! disclaimer, chat escalation and apology messages, condition blurbs.

use serde::Serialize;

use crate::context::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    NoticeNotAnImage,
    NoticeTooLarge,
    NoticeCameraDenied,
    NoticeCameraUnavailable,
    NoticeAnalysisFailed,
    NoticeBusy,
    ResultsHeading,
    MostLikely,
    Symptoms,
    AffectedAreas,
    ConfidenceBreakdown,
    AskAssistant,
    DisclaimerTitle,
    DisclaimerText,
    LowConfidenceBanner,
    ChatLowConfidenceWarning,
    ChatApology,
}

pub fn text(language: Language, key: TextKey) -> &'static str {
    use TextKey::*;
    match (language, key) {
        (Language::En, NoticeNotAnImage) => "Please select an image file.",
        (Language::Tr, NoticeNotAnImage) => "Lütfen bir resim dosyası seçin.",
        (Language::En, NoticeTooLarge) => "File size must be less than 10MB.",
        (Language::Tr, NoticeTooLarge) => "Dosya boyutu 10MB'dan az olmalıdır.",
        (Language::En, NoticeCameraDenied) => {
            "Could not access camera. Please check permissions."
        }
        (Language::Tr, NoticeCameraDenied) => {
            "Kameraya erişilemedi. Lütfen izinleri kontrol edin."
        }
        (Language::En, NoticeCameraUnavailable) => "No camera is available on this device.",
        (Language::Tr, NoticeCameraUnavailable) => "Bu cihazda kullanılabilir kamera yok.",
        (Language::En, NoticeAnalysisFailed) => {
            "An error occurred during analysis. Please make sure the server is running and try again."
        }
        (Language::Tr, NoticeAnalysisFailed) => {
            "Analiz sırasında bir hata oluştu. Lütfen sunucunun çalıştığından emin olun ve tekrar deneyin."
        }
        (Language::En, NoticeBusy) => "Please wait for the current analysis to finish.",
        (Language::Tr, NoticeBusy) => "Lütfen mevcut analizin bitmesini bekleyin.",
        (Language::En, ResultsHeading) => "Analysis Results",
        (Language::Tr, ResultsHeading) => "Analiz Sonuçları",
        (Language::En, MostLikely) => "Most Likely:",
        (Language::Tr, MostLikely) => "En Olası:",
        (Language::En, Symptoms) => "Symptoms:",
        (Language::Tr, Symptoms) => "Belirtiler:",
        (Language::En, AffectedAreas) => "Affected Areas:",
        (Language::Tr, AffectedAreas) => "Etkilenen Bölgeler:",
        (Language::En, ConfidenceBreakdown) => "Confidence Breakdown:",
        (Language::Tr, ConfidenceBreakdown) => "Güven Dağılımı:",
        (Language::En, AskAssistant) => "Ask Chatbot for More Info",
        (Language::Tr, AskAssistant) => "Daha Fazla Bilgi İçin Chatbot'a Sor",
        (Language::En, DisclaimerTitle) => "Medical Disclaimer:",
        (Language::Tr, DisclaimerTitle) => "Tıbbi Uyarı:",
        (Language::En, DisclaimerText) => {
            "This is for educational purposes only and cannot diagnose skin conditions. \
             Results are AI-generated estimates and may not be accurate. Please consult a \
             dermatologist for professional medical advice and proper diagnosis."
        }
        (Language::Tr, DisclaimerText) => {
            "Bu platform yalnızca eğitim amaçlıdır ve cilt koşullarını teşhis edemez. \
             Sonuçlar yapay zeka tahminidir ve doğru olmayabilir. Profesyonel tıbbi tavsiye \
             ve doğru teşhis için lütfen bir dermatoloğa danışın."
        }
        (Language::En, LowConfidenceBanner) => {
            "The confidence level is below 70%. The image may not clearly show Acne, Eczema, \
             or Vitiligo, or it may be a different condition."
        }
        (Language::Tr, LowConfidenceBanner) => {
            "Güven seviyesi %70'in altında. Görüntü Akne, Egzama veya Vitiligo'yu açıkça \
             göstermeyebilir ya da farklı bir durum olabilir."
        }
        (Language::En, ChatLowConfidenceWarning) => {
            "⚠️ Note: The recent prediction had low confidence. The image may not clearly show \
             Acne, Eczema, or Vitiligo. Please consult a dermatologist."
        }
        (Language::Tr, ChatLowConfidenceWarning) => {
            "⚠️ Not: Son tahmin düşük güven seviyesine sahipti. Görüntü Akne, Egzama veya \
             Vitiligo'yu açıkça göstermeyebilir. Lütfen bir dermatoloğa danışın."
        }
        (Language::En, ChatApology) => {
            "Sorry, I'm having trouble connecting. Please make sure the server is running."
        }
        (Language::Tr, ChatApology) => {
            "Üzgünüm, bağlantı kurmakta sorun yaşıyorum. Lütfen sunucunun çalıştığından emin olun."
        }
    }
}

/// Short educational card shown under the dominant label.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionBlurb {
    pub description: &'static str,
    pub symptoms: &'static str,
    pub affected: &'static str,
}

/// Blurb for a classifier label, matched case-insensitively. Labels the service
/// may emit without a card (e.g. "Other / Unknown") return `None`.
pub fn condition_blurb(label: &str, language: Language) -> Option<ConditionBlurb> {
    let key = label.trim().to_lowercase();
    let blurb = match (key.as_str(), language) {
        ("acne", Language::En) => ConditionBlurb {
            description: "Acne is a common skin condition that occurs when hair follicles become clogged with oil and dead skin cells, leading to pimples, blackheads, or whiteheads.",
            symptoms: "Pimples, blackheads, whiteheads, oily skin",
            affected: "Face, forehead, chest, upper back, shoulders",
        },
        ("acne", Language::Tr) => ConditionBlurb {
            description: "Akne, saç foliküllerinin yağ ve ölü deri hücreleri ile tıkanması sonucu oluşan yaygın bir cilt durumudur.",
            symptoms: "Sivilceler, siyah noktalar, beyaz noktalar, yağlı cilt",
            affected: "Yüz, alın, göğüs, üst sırt, omuzlar",
        },
        ("eczema", Language::En) => ConditionBlurb {
            description: "Eczema (atopic dermatitis) causes skin to become itchy, red, dry, and cracked. It's common in children but can occur at any age.",
            symptoms: "Itchy, red, dry, cracked skin, inflammation",
            affected: "Inner elbows, behind knees, hands, face, scalp",
        },
        ("eczema", Language::Tr) => ConditionBlurb {
            description: "Egzama (atopik dermatit) cildin kaşıntılı, kırmızı, kuru ve çatlamış olmasına neden olur.",
            symptoms: "Kaşıntılı, kırmızı, kuru, çatlamış cilt, iltihaplanma",
            affected: "İç dirsekler, dizlerin arkası, eller, yüz, saç derisi",
        },
        ("vitiligo", Language::En) => ConditionBlurb {
            description: "Vitiligo is a condition where the skin loses its pigment cells (melanocytes), resulting in discolored patches on various areas of the body.",
            symptoms: "White patches on skin, premature graying of hair",
            affected: "Face, hands, arms, feet, areas around body openings",
        },
        ("vitiligo", Language::Tr) => ConditionBlurb {
            description: "Vitiligo, cildin pigment hücrelerini (melanositleri) kaybetmesi sonucu renksiz lekeler oluşmasına neden olan bir durumdur.",
            symptoms: "Ciltte beyaz lekeler, saçların erken beyazlaması",
            affected: "Yüz, eller, kollar, ayaklar, vücut açıklıklarının çevresi",
        },
        _ => return None,
    };
    Some(blurb)
}
