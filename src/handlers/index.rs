use axum::response::Html;

/// `GET /`: single-page upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Instagram Caption &amp; Music Recommender</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f4f1ec;
            min-height: 100vh;
            display: flex;
            justify-content: center;
            padding: 50px 20px;
        }

        .panel {
            background: white;
            border-radius: 12px;
            box-shadow: 0 8px 30px rgba(0,0,0,0.12);
            max-width: 720px;
            width: 100%;
            padding: 32px;
            text-align: center;
        }

        h1 { color: #2d2a26; font-size: 1.6em; margin-bottom: 24px; }
        h2 { color: #2d2a26; font-size: 1.2em; margin-bottom: 12px; }

        .controls {
            display: flex;
            flex-wrap: wrap;
            gap: 16px;
            justify-content: center;
            align-items: center;
            margin-bottom: 20px;
        }

        label { color: #555; font-size: 0.9em; }

        button {
            border: none;
            border-radius: 8px;
            padding: 10px 18px;
            font-weight: 600;
            cursor: pointer;
            background: #d9485f;
            color: white;
        }

        button.secondary { background: #e3ded6; color: #2d2a26; }
        button:disabled { opacity: 0.5; cursor: not-allowed; }

        #preview { max-width: 100%; max-height: 320px; border-radius: 8px; margin: 16px auto; display: none; }

        #result {
            display: none;
            text-align: left;
            white-space: pre-wrap;
            background: #faf8f5;
            border-radius: 8px;
            padding: 18px;
            margin-top: 20px;
            line-height: 1.5;
        }

        #error { display: none; color: #b3261e; margin-top: 16px; }
    </style>
</head>
<body>
    <div class="panel">
        <h1>Instagram Caption &amp; Music Recommender</h1>

        <div class="controls">
            <input type="file" id="fileInput" accept="image/*">
        </div>

        <div class="controls">
            <label>Caption model
                <select id="modelType">
                    <option value="base" selected>BLIP base</option>
                    <option value="large">BLIP large</option>
                </select>
            </label>
            <label>Creativity
                <input type="range" id="temperature" min="0" max="2" step="0.1" value="0.7">
                <span id="temperatureValue">0.7</span>
            </label>
        </div>

        <div class="controls">
            <button id="submitBtn" disabled>Get Captions and Music</button>
            <button id="clearBtn" class="secondary">Clear</button>
        </div>

        <img id="preview" alt="Preview">
        <div id="error"></div>

        <div id="result">
            <h2>Recommendations:</h2>
            <p id="resultText"></p>
        </div>
    </div>

    <script>
        const fileInput = document.getElementById('fileInput');
        const modelType = document.getElementById('modelType');
        const temperature = document.getElementById('temperature');
        const temperatureValue = document.getElementById('temperatureValue');
        const submitBtn = document.getElementById('submitBtn');
        const clearBtn = document.getElementById('clearBtn');
        const preview = document.getElementById('preview');
        const errorDiv = document.getElementById('error');
        const resultDiv = document.getElementById('result');
        const resultText = document.getElementById('resultText');

        let loading = false;

        function refreshButton() {
            submitBtn.disabled = !fileInput.files[0] || loading;
            submitBtn.textContent = loading ? 'Processing...' : 'Get Captions and Music';
        }

        temperature.addEventListener('input', () => {
            temperatureValue.textContent = temperature.value;
        });

        fileInput.addEventListener('change', () => {
            const file = fileInput.files[0];
            if (file) {
                preview.src = URL.createObjectURL(file);
                preview.style.display = 'block';
            }
            refreshButton();
        });

        submitBtn.addEventListener('click', async () => {
            const file = fileInput.files[0];
            if (!file) {
                alert('Please select an image first!');
                return;
            }

            loading = true;
            refreshButton();
            errorDiv.style.display = 'none';

            const formData = new FormData();
            formData.append('image', file);
            formData.append('model_type', modelType.value);
            formData.append('temperature', temperature.value);

            try {
                const response = await fetch('/upload', { method: 'POST', body: formData });
                const body = await response.json();
                if (!response.ok) {
                    throw new Error(body.error || 'Upload failed');
                }
                resultText.textContent = body.result;
                resultDiv.style.display = 'block';
            } catch (error) {
                errorDiv.textContent = 'Error: ' + error.message;
                errorDiv.style.display = 'block';
            } finally {
                loading = false;
                refreshButton();
            }
        });

        clearBtn.addEventListener('click', () => {
            fileInput.value = '';
            preview.style.display = 'none';
            preview.removeAttribute('src');
            resultText.textContent = '';
            resultDiv.style.display = 'none';
            errorDiv.style.display = 'none';
            refreshButton();
        });
    </script>
</body>
</html>
"#;
