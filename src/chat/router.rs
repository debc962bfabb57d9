//! Offline keyword router: ordered rule tables per language with a guaranteed
//! default answer.

use crate::context::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Acne,
    Eczema,
    Vitiligo,
    Skincare,
    General,
}

pub struct Rule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

const EN_RULES: &[Rule] = &[
    Rule {
        topic: Topic::Acne,
        keywords: &["acne", "pimple", "pimples", "breakout", "zit", "blackhead", "whitehead"],
        response: "Acne is caused by a combination of factors including excess oil production, clogged pores, bacteria, and hormonal changes. Here are some general tips:\n\n• Wash your face twice daily with a gentle cleanser\n• Avoid touching your face\n• Use non-comedogenic (won't clog pores) products\n• Stay hydrated and maintain a balanced diet\n• Manage stress levels\n\nFor persistent or severe acne, I recommend consulting a dermatologist for personalized treatment options.",
    },
    Rule {
        topic: Topic::Eczema,
        keywords: &["eczema", "atopic", "dermatitis", "itchy skin", "dry skin", "rash"],
        response: "Eczema (atopic dermatitis) causes itchy, red, and dry skin. Here are some general management tips:\n\n• Moisturize frequently, especially after bathing\n• Use lukewarm water for showers (avoid hot water)\n• Choose fragrance-free, gentle products\n• Wear soft, breathable fabrics like cotton\n• Identify and avoid your personal triggers\n• Keep your nails short to prevent scratching damage\n\nIf symptoms persist or worsen, please consult a healthcare professional for proper treatment.",
    },
    Rule {
        topic: Topic::Vitiligo,
        keywords: &["vitiligo", "white patches", "skin color", "pigment", "depigmentation"],
        response: "Vitiligo is a condition where the skin loses its pigment in patches. While it's not harmful or contagious, here are some tips:\n\n• Protect your skin from the sun with SPF 30+ sunscreen\n• Be gentle with your skin to avoid irritation\n• Consider cosmetic options if desired\n• Connect with support communities\n• Focus on overall skin health\n\nVitiligo affects people differently. A dermatologist can discuss treatment options and help you find the best approach for your situation.",
    },
    Rule {
        topic: Topic::Skincare,
        keywords: &["skincare", "skin care", "routine", "tips", "healthy skin", "skin health"],
        response: "Here are some basic skincare tips for healthy skin:\n\n• Cleanse gently twice daily\n• Apply sunscreen (SPF 30+) every day, even on cloudy days\n• Moisturize according to your skin type\n• Stay hydrated by drinking plenty of water\n• Get enough sleep for skin regeneration\n• Eat a balanced diet rich in vitamins\n• Avoid touching your face frequently\n• Don't pick at your skin\n\nRemember, everyone's skin is different. What works for one person may not work for another.",
    },
];

const EN_DEFAULT: &str = "Thank you for your question! While I can provide general information about skin health, I want to remind you that I'm not a medical professional. For specific concerns or symptoms, please consult a dermatologist or healthcare provider.\n\nI can help with general information about:\n• Common skin conditions (acne, eczema, vitiligo)\n• Basic skincare tips\n• Sun protection advice\n\nWhat would you like to know more about?";

const TR_RULES: &[Rule] = &[
    Rule {
        topic: Topic::Acne,
        keywords: &["akne", "sivilce", "sivilceler", "siyah nokta", "beyaz nokta"],
        response: "Akne, aşırı yağ üretimi, tıkalı gözenekler, bakteriler ve hormonal değişiklikler gibi faktörlerin bir kombinasyonundan kaynaklanır. İşte bazı genel ipuçları:\n\n• Yüzünüzü günde iki kez nazik bir temizleyiciyle yıkayın\n• Yüzünüze dokunmaktan kaçının\n• Gözenek tıkamayan ürünler kullanın\n• Bol su için ve dengeli beslenin\n• Stres seviyelerinizi yönetin\n\nKalıcı veya şiddetli akne için kişiselleştirilmiş tedavi seçenekleri için dermatoloğa danışmanızı öneririm.",
    },
    Rule {
        topic: Topic::Eczema,
        keywords: &["egzama", "atopik", "dermatit", "kaşıntılı cilt", "kuru cilt", "döküntü"],
        response: "Egzama (atopik dermatit) kaşıntılı, kırmızı ve kuru cilde neden olur. İşte bazı genel yönetim ipuçları:\n\n• Sık sık nemlendirici kullanın, özellikle banyodan sonra\n• Duş için ılık su kullanın (sıcak sudan kaçının)\n• Parfümsüz, nazik ürünler seçin\n• Pamuk gibi yumuşak, nefes alabilen kumaşlar giyin\n• Kişisel tetikleyicilerinizi belirleyin ve kaçının\n• Kaşıma hasarını önlemek için tırnaklarınızı kısa tutun\n\nBelirtiler devam ederse veya kötüleşirse, uygun tedavi için bir sağlık uzmanına danışın.",
    },
    Rule {
        topic: Topic::Vitiligo,
        keywords: &["vitiligo", "beyaz yamalar", "cilt rengi", "pigment"],
        response: "Vitiligo, cildin yamalı olarak pigmentini kaybettiği bir durumdur. Zararlı veya bulaşıcı olmamakla birlikte, işte bazı ipuçları:\n\n• Cildinizi SPF 30+ güneş kremi ile güneşten koruyun\n• Tahrişi önlemek için cildinize nazik davranın\n• İsterseniz kozmetik seçeneklerini değerlendirin\n• Destek topluluklarıyla bağlantı kurun\n• Genel cilt sağlığına odaklanın\n\nVitiligo herkesi farklı etkiler. Bir dermatolog tedavi seçeneklerini tartışabilir ve durumunuz için en iyi yaklaşımı bulmanıza yardımcı olabilir.",
    },
    Rule {
        topic: Topic::Skincare,
        keywords: &["cilt bakımı", "rutin", "ipuçları", "sağlıklı cilt", "cilt sağlığı"],
        response: "İşte sağlıklı cilt için bazı temel cilt bakımı ipuçları:\n\n• Günde iki kez nazikçe temizleyin\n• Her gün güneş kremi (SPF 30+) uygulayın, bulutlu günlerde bile\n• Cilt tipinize göre nemlendirin\n• Bol su içerek vücudunuzu nemlendirin\n• Cilt yenilenmesi için yeterli uyku alın\n• Vitaminler açısından zengin dengeli beslenin\n• Sık sık yüzünüze dokunmaktan kaçının\n• Cildinizi koparmayın\n\nUnutmayın, herkesin cildi farklıdır. Bir kişi için işe yarayan, başka biri için işe yaramayabilir.",
    },
];

const TR_DEFAULT: &str = "Sorunuz için teşekkürler! Cilt sağlığı hakkında genel bilgiler sağlayabilsem de, tıp uzmanı olmadığımı hatırlatmak isterim. Özel endişeler veya belirtiler için lütfen bir dermatoloğa veya sağlık hizmeti sağlayıcısına danışın.\n\nŞu konularda genel bilgiler sunabilirim:\n• Yaygın cilt koşulları (akne, egzama, vitiligo)\n• Temel cilt bakımı ipuçları\n• Güneşten korunma tavsiyeleri\n\nNe hakkında daha fazla bilgi edinmek istersiniz?";

pub fn rules(language: Language) -> &'static [Rule] {
    match language {
        Language::En => EN_RULES,
        Language::Tr => TR_RULES,
    }
}

fn default_response(language: Language) -> &'static str {
    match language {
        Language::En => EN_DEFAULT,
        Language::Tr => TR_DEFAULT,
    }
}

/// First rule whose keyword occurs in the lower-cased message wins.
pub fn route(message: &str, language: Language) -> (Topic, &'static str) {
    let lowered = message.to_lowercase();
    rules(language)
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| (rule.topic, rule.response))
        .unwrap_or((Topic::General, default_response(language)))
}
